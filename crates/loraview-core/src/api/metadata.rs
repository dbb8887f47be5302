//! Metadata extraction pipeline.

use crate::error::Result;
use crate::safetensors::{parse_metadata, MetadataDocument};
use crate::LoraApi;
use tracing::{info, warn};

impl LoraApi {
    /// Read the `__metadata__` document of a LoRA file.
    ///
    /// Resolves `identifier` under the LoRA root, reads the file and parses
    /// its safetensors header. A malformed container fails the request; no
    /// partial document is returned.
    pub async fn get_metadata(&self, identifier: &str) -> Result<MetadataDocument> {
        let bytes = self.read_lora(identifier).await?;

        match parse_metadata(&bytes) {
            Ok(metadata) => {
                info!(
                    "Extracted metadata for '{}' ({} entries)",
                    identifier,
                    metadata.len()
                );
                Ok(metadata)
            }
            Err(e) => {
                warn!("Failed to parse metadata for '{}': {}", identifier, e);
                Err(e.into())
            }
        }
    }
}
