//! Content hashes used by model registries to fingerprint LoRA files.
//!
//! - AutoV2: SHA256 of the whole file
//! - AutoV3: SHA256 of the tensor payload only, skipping the length prefix
//!   and JSON header, so metadata edits do not change the fingerprint

use crate::error::{LoraError, Result};
use crate::safetensors::ContainerHeader;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Hash convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashVariant {
    AutoV2,
    AutoV3,
}

impl HashVariant {
    /// Variants in the order they are tried against a registry.
    pub const LOOKUP_ORDER: [HashVariant; 2] = [HashVariant::AutoV2, HashVariant::AutoV3];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashVariant::AutoV2 => "AutoV2",
            HashVariant::AutoV3 => "AutoV3",
        }
    }
}

impl std::fmt::Display for HashVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    pub variant: HashVariant,
    /// SHA256 digest as lowercase hex (64 characters)
    pub hex: String,
}

/// Compute a content hash of `bytes`.
///
/// AutoV3 derives the payload offset from the length prefix on its own and
/// fails with an input error when the prefix is missing, zero, oversized
/// or points past the end of the buffer.
pub fn compute_hash(bytes: &[u8], variant: HashVariant) -> Result<ContentHash> {
    let hashed = match variant {
        HashVariant::AutoV2 => bytes,
        HashVariant::AutoV3 => {
            let header = ContainerHeader::read(bytes).map_err(LoraError::InvalidHashInput)?;
            &bytes[header.payload_offset()..]
        }
    };

    Ok(ContentHash {
        variant,
        hex: hex::encode(Sha256::digest(hashed)),
    })
}

/// Compute a content hash on the blocking thread pool.
///
/// Hashing a multi-hundred-megabyte file takes long enough to stall an
/// async worker.
pub async fn compute_hash_async(bytes: Arc<Vec<u8>>, variant: HashVariant) -> Result<ContentHash> {
    tokio::task::spawn_blocking(move || compute_hash(&bytes, variant))
        .await
        .map_err(|e| LoraError::Other(format!("Hash computation task failed: {}", e)))?
}
