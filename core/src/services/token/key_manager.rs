//! RS256 key management for JWT signing and verification

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fs;
use std::path::{Path, PathBuf};

use sk_shared::KeyPairConfig;

use crate::errors::{DomainError, TokenError};

/// Where the keys were loaded from, kept for reloads and logging
#[derive(Debug, Clone)]
enum KeySource {
    Files {
        private_key_path: Option<PathBuf>,
        public_key_path: PathBuf,
    },
    Memory,
}

/// Manager for one RS256 key pair
///
/// The private key is optional: a process that only validates tokens can be
/// built from the public key alone, and any attempt to sign with it fails.
#[derive(Clone)]
pub struct Rs256KeyManager {
    /// Private key for signing JWTs
    encoding_key: Option<EncodingKey>,
    /// Public key for verifying JWTs
    decoding_key: DecodingKey,
    source: KeySource,
}

impl std::fmt::Debug for Rs256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256KeyManager")
            .field("can_sign", &self.can_sign())
            .field("source", &self.source)
            .finish()
    }
}

fn key_error(message: String) -> DomainError {
    DomainError::Token(TokenError::KeyUnavailable { message })
}

fn read_key(path: &Path, what: &str) -> Result<Vec<u8>, DomainError> {
    fs::read(path).map_err(|e| key_error(format!("Failed to read {} {}: {}", what, path.display(), e)))
}

fn parse_private(pem: &[u8]) -> Result<EncodingKey, DomainError> {
    EncodingKey::from_rsa_pem(pem).map_err(|e| key_error(format!("Invalid private key format: {}", e)))
}

fn parse_public(pem: &[u8]) -> Result<DecodingKey, DomainError> {
    DecodingKey::from_rsa_pem(pem).map_err(|e| key_error(format!("Invalid public key format: {}", e)))
}

fn decode_base64(value: &str, what: &str) -> Result<Vec<u8>, DomainError> {
    let compact: String = value.split_whitespace().collect();
    STANDARD
        .decode(compact)
        .map_err(|e| key_error(format!("Invalid base64 {}: {}", what, e)))
}

impl Rs256KeyManager {
    /// Creates a new RS256 key manager from key file paths
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded private key file
    /// * `public_key_path` - Path to the PEM-encoded public key file
    ///
    /// # Returns
    ///
    /// * `Ok(Rs256KeyManager)` - Key manager initialized successfully
    /// * `Err(DomainError)` - Failed to load keys
    pub fn new<P: AsRef<Path>>(private_key_path: P, public_key_path: P) -> Result<Self, DomainError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let encoding_key = parse_private(&read_key(&private_key_path, "private key")?)?;
        let decoding_key = parse_public(&read_key(&public_key_path, "public key")?)?;

        Ok(Self {
            encoding_key: Some(encoding_key),
            decoding_key,
            source: KeySource::Files {
                private_key_path: Some(private_key_path),
                public_key_path,
            },
        })
    }

    /// Creates a verify-only key manager from a public key file
    pub fn verifier_from_file<P: AsRef<Path>>(public_key_path: P) -> Result<Self, DomainError> {
        let public_key_path = public_key_path.as_ref().to_path_buf();
        let decoding_key = parse_public(&read_key(&public_key_path, "public key")?)?;

        Ok(Self {
            encoding_key: None,
            decoding_key,
            source: KeySource::Files {
                private_key_path: None,
                public_key_path,
            },
        })
    }

    /// Creates a key manager from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(private_key_pem: &str, public_key_pem: &str) -> Result<Self, DomainError> {
        Ok(Self {
            encoding_key: Some(parse_private(private_key_pem.as_bytes())?),
            decoding_key: parse_public(public_key_pem.as_bytes())?,
            source: KeySource::Memory,
        })
    }

    /// Creates a verify-only key manager from a PEM string
    pub fn verifier_from_pem(public_key_pem: &str) -> Result<Self, DomainError> {
        Ok(Self {
            encoding_key: None,
            decoding_key: parse_public(public_key_pem.as_bytes())?,
            source: KeySource::Memory,
        })
    }

    /// Creates a key manager from base64-encoded PEM documents, the form keys
    /// take when passed through environment variables
    pub fn from_base64_pem(private_key: Option<&str>, public_key: &str) -> Result<Self, DomainError> {
        let encoding_key = private_key
            .map(|encoded| decode_base64(encoded, "private key").and_then(|pem| parse_private(&pem)))
            .transpose()?;
        let decoding_key = parse_public(&decode_base64(public_key, "public key")?)?;

        Ok(Self {
            encoding_key,
            decoding_key,
            source: KeySource::Memory,
        })
    }

    /// Creates a key manager from configuration; inline keys win over paths
    pub fn from_config(config: &KeyPairConfig) -> Result<Self, DomainError> {
        if let Some(public_key) = config.public_key.as_deref() {
            return Self::from_base64_pem(config.private_key.as_deref(), public_key);
        }

        let public_key_path = config
            .public_key_path
            .as_deref()
            .ok_or_else(|| key_error("No public key configured".to_string()))?;

        match config.private_key_path.as_deref() {
            Some(private_key_path) => Self::new(private_key_path, public_key_path),
            None => Self::verifier_from_file(public_key_path),
        }
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> Result<&EncodingKey, DomainError> {
        self.encoding_key
            .as_ref()
            .ok_or_else(|| key_error("No private key loaded; this key pair can only verify".to_string()))
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }

    /// Reloads keys from disk (useful for key rotation)
    pub fn reload(&mut self) -> Result<(), DomainError> {
        let KeySource::Files {
            private_key_path,
            public_key_path,
        } = &self.source
        else {
            return Ok(());
        };

        let reloaded = match private_key_path {
            Some(private_key_path) => Self::new(private_key_path, public_key_path)?,
            None => Self::verifier_from_file(public_key_path)?,
        };
        *self = reloaded;

        Ok(())
    }
}
