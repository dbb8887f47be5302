//! Registry lookup pipeline.
//!
//! Hashes are tried in [`HashVariant::LOOKUP_ORDER`]. The next variant is
//! only tried after the registry confirmed the previous one is unknown; a
//! failed query ends the lookup.

use crate::error::{LoraError, Result};
use crate::hashing::{compute_hash_async, ContentHash, HashVariant};
use crate::registry::RegistryLookup;
use crate::LoraApi;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a registry lookup.
///
/// Serializes as `{"found": false}` or
/// `{"found": true, "hashUsed": ..., "hashValue": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryLookupResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_used: Option<HashVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RegistryLookupResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            hash_used: None,
            hash_value: None,
            data: None,
        }
    }

    pub fn matched(hash: ContentHash, record: Value) -> Self {
        Self {
            found: true,
            hash_used: Some(hash.variant),
            hash_value: Some(hash.hex),
            data: Some(record),
        }
    }
}

impl LoraApi {
    /// Identify a LoRA file on the model registry by content hash.
    ///
    /// Tries AutoV2 first and falls back to AutoV3 only when the registry
    /// reports AutoV2 as unknown. Files without a readable safetensors
    /// header have no AutoV3 hash and end the lookup as not found. Empty
    /// files are never sent to the registry.
    pub async fn lookup_registry(&self, identifier: &str) -> Result<RegistryLookupResult> {
        let bytes = Arc::new(self.read_lora(identifier).await?);
        if bytes.is_empty() {
            warn!("'{}' is empty, skipping registry lookup", identifier);
            return Ok(RegistryLookupResult::not_found());
        }
        let registry = &self.inner.registry;

        for variant in HashVariant::LOOKUP_ORDER {
            let hash = match compute_hash_async(bytes.clone(), variant).await {
                Ok(hash) => hash,
                Err(LoraError::InvalidHashInput(reason)) => {
                    warn!(
                        "Cannot compute {} hash for '{}': {}",
                        variant, identifier, reason
                    );
                    break;
                }
                Err(e) => return Err(e),
            };
            info!("Calculated {} hash for '{}': {}", variant, identifier, hash.hex);

            match registry.lookup_by_hash(&hash.hex).await? {
                RegistryLookup::Found(record) => {
                    info!(
                        "Found {} record for '{}' using {} hash",
                        registry.id(),
                        identifier,
                        variant
                    );
                    return Ok(RegistryLookupResult::matched(hash, record));
                }
                RegistryLookup::NotFound => {
                    info!(
                        "No {} record for '{}' with {} hash",
                        registry.id(),
                        identifier,
                        variant
                    );
                }
            }
        }

        Ok(RegistryLookupResult::not_found())
    }
}
