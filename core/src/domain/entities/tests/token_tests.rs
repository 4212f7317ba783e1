//! Unit tests for token entities

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{Claims, TokenId, TokenKind, UserId};

fn user() -> UserId {
    UserId::from_uuid(Uuid::new_v4())
}

#[test]
fn test_access_claims() {
    let user_id = user();
    let token_id = TokenId::generate();
    let now = Utc::now();
    let claims = Claims::new_access(
        user_id,
        token_id,
        now,
        now + Duration::minutes(15),
        "sessionkeep",
        "sessionkeep-api",
    );

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.jti, token_id);
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.nbf, claims.iat);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert!(claims.access_token_id.is_none());
    assert!(!claims.is_expired());
}

#[test]
fn test_refresh_claims_carry_linked_access_id() {
    let access_id = TokenId::generate();
    let now = Utc::now();
    let claims = Claims::new_refresh(
        user(),
        TokenId::generate(),
        now,
        now + Duration::days(7),
        "sessionkeep",
        "sessionkeep-api",
        access_id,
    );

    assert_eq!(claims.kind, TokenKind::Refresh);
    assert_eq!(claims.access_token_id, Some(access_id));
}

#[test]
fn test_access_claims_omit_refresh_only_field() {
    let now = Utc::now();
    let claims = Claims::new_access(user(), TokenId::generate(), now, now, "iss", "aud");
    let json = serde_json::to_value(&claims).unwrap();

    assert!(json.get("access_token_id").is_none());
    assert_eq!(json["kind"], "access");
}

#[test]
fn test_expired_claims() {
    let now = Utc::now();
    let claims = Claims::new_access(
        user(),
        TokenId::generate(),
        now - Duration::hours(2),
        now - Duration::hours(1),
        "iss",
        "aud",
    );

    assert!(claims.is_expired());
    assert!(claims.expires_at().unwrap() < now);
}

#[test]
fn test_token_ids_are_time_ordered() {
    let first = TokenId::generate();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = TokenId::generate();

    assert!(first < second);
    assert!(first.to_string() < second.to_string());
}

#[test]
fn test_token_id_parse_roundtrip() {
    let id = TokenId::generate();
    let parsed: TokenId = id.to_string().parse().unwrap();

    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<TokenId>().is_err());
}
