//! API implementation submodules.
//!
//! Each submodule contains `impl LoraApi` blocks that extend the public API
//! with one request pipeline. The struct definitions remain in `lib.rs`.

mod builder;
mod metadata;
mod registry;

#[cfg(test)]
mod test_support;

pub use builder::LoraApiBuilder;
pub use registry::RegistryLookupResult;

use crate::error::{LoraError, Result};
use crate::resolver::ResolvedPath;
use crate::LoraApi;
use tracing::debug;

impl LoraApi {
    /// Resolve `identifier` and read the whole file into memory.
    async fn read_lora(&self, identifier: &str) -> Result<Vec<u8>> {
        let path: ResolvedPath = self.inner.resolver.resolve(identifier)?;
        let bytes = tokio::fs::read(path.as_path()).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                // Removed between resolution and read.
                LoraError::FileNotFound {
                    identifier: identifier.to_string(),
                }
            } else {
                LoraError::io_with_path(e, path.as_path())
            }
        })?;
        debug!("Read {} bytes for '{}'", bytes.len(), identifier);
        Ok(bytes)
    }
}
