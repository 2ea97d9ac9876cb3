//! # Content Digest
//!
//! SHA-256 digest of the composed schema bytes. The Builder reports it after
//! every write so that repeated builds can be compared at a glance.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::SchemaBytes;

/// A SHA-256 digest of serialized schema bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of schema bytes.
///
/// Accepts only `&SchemaBytes` so that the digest always describes exactly
/// what is written to disk.
pub fn sha256_digest(data: &SchemaBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest { bytes }
}
