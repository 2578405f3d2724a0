//! HMAC-SHA256 authenticity seal with key versioning.
//!
//! A seal binds an artifact's content hash to its identity metadata:
//!
//! ```text
//! seal = HMAC-SHA256(key[v], "{sha256(image)}:{artifact_id}:{creator_id}:{model}:{v}")
//! ```
//!
//! Key versioning allows the signing key to rotate without invalidating
//! existing seals — each artifact row stores the `key_version` it was
//! sealed with, and verification looks up that specific key.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Metadata fields bound into an authenticity seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealMetadata {
    pub artifact_id: String,
    pub creator_id: String,
    pub model_name: String,
    pub key_version: u32,
}

/// A computed seal plus the content hash it covers (both hex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal {
    pub signature: String,
    pub content_hash: String,
}

/// Errors from seal operations.
#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("unknown seal key version: {0}")]
    UnknownKeyVersion(u32),

    #[error("invalid seal key: {0}")]
    InvalidKey(String),
}

/// Versioned HMAC key set with one active signing version.
#[derive(Debug, Clone)]
pub struct SealKeyring {
    keys: BTreeMap<u32, Vec<u8>>,
    active_version: u32,
}

impl SealKeyring {
    /// Create a keyring with a single key at `version`.
    pub fn new(version: u32, key: impl Into<Vec<u8>>) -> Self {
        let mut keys = BTreeMap::new();
        keys.insert(version, key.into());
        Self {
            keys,
            active_version: version,
        }
    }

    /// Add a retired key so old seals keep verifying.
    pub fn with_key(mut self, version: u32, key: impl Into<Vec<u8>>) -> Self {
        self.keys.insert(version, key.into());
        self
    }

    /// Install a new signing key and make it active. Earlier versions stay
    /// available for verification.
    pub fn rotate(&mut self, version: u32, key: impl Into<Vec<u8>>) {
        self.keys.insert(version, key.into());
        self.active_version = version;
    }

    pub fn active_version(&self) -> u32 {
        self.active_version
    }

    /// Compute the seal and content hash for `image_bytes`.
    ///
    /// Uses the key for `metadata.key_version`, which must exist.
    pub fn create_seal(
        &self,
        image_bytes: &[u8],
        metadata: &SealMetadata,
    ) -> Result<Seal, SealError> {
        let key = self
            .keys
            .get(&metadata.key_version)
            .ok_or(SealError::UnknownKeyVersion(metadata.key_version))?;

        let content_hash = hex::encode(Sha256::digest(image_bytes));
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|err| SealError::InvalidKey(err.to_string()))?;
        mac.update(seal_data(&content_hash, metadata).as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(Seal {
            signature,
            content_hash,
        })
    }

    /// Verify a seal against the image and metadata, in constant time.
    ///
    /// Any mismatch — tampered bytes, altered metadata, unknown key
    /// version, malformed signature — verifies false.
    pub fn verify_seal(
        &self,
        image_bytes: &[u8],
        metadata: &SealMetadata,
        signature_hex: &str,
    ) -> bool {
        let Some(key) = self.keys.get(&metadata.key_version) else {
            return false;
        };
        let Ok(provided) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
            return false;
        };

        let content_hash = hex::encode(Sha256::digest(image_bytes));
        mac.update(seal_data(&content_hash, metadata).as_bytes());
        mac.verify_slice(&provided).is_ok()
    }
}

fn seal_data(content_hash: &str, metadata: &SealMetadata) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        content_hash,
        metadata.artifact_id,
        metadata.creator_id,
        metadata.model_name,
        metadata.key_version
    )
}
