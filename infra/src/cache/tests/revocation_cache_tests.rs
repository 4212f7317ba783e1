//! Unit tests for revocation cache key layout

use std::str::FromStr;

use sk_core::domain::entities::TokenId;

use crate::cache::revocation_cache::token_key;
use crate::cache::CacheConfig;

#[test]
fn test_token_key_uses_prefix() {
    let token_id = TokenId::from_str("01890a5d-ac96-774b-bcce-b302099a8057").unwrap();
    let config = CacheConfig::default();

    assert_eq!(
        token_key(&config, token_id),
        "session:01890a5d-ac96-774b-bcce-b302099a8057"
    );
}

#[test]
fn test_token_key_without_prefix() {
    let token_id = TokenId::generate();
    let config = CacheConfig::default().with_prefix("");

    assert_eq!(token_key(&config, token_id), token_id.to_string());
}
