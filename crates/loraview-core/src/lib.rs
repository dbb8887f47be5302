//! LoRA viewer core - metadata extraction and registry lookup for LoRA files.
//!
//! This crate resolves untrusted LoRA identifiers to files under a fixed
//! root, extracts the `__metadata__` document embedded in safetensors
//! headers, and fingerprints files with the AutoV2/AutoV3 hash conventions
//! to look them up on a model registry. It has no HTTP server of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use loraview_core::LoraApi;
//!
//! #[tokio::main]
//! async fn main() -> loraview_core::Result<()> {
//!     let api = LoraApi::new("/srv/models/lora")?;
//!
//!     let metadata = api.get_metadata("sdxl/ink_style.safetensors").await?;
//!     println!("{} metadata entries", metadata.len());
//!
//!     let lookup = api.lookup_registry("sdxl/ink_style.safetensors").await?;
//!     println!("found on registry: {}", lookup.found);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod hashing;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod safetensors;

mod api;

pub use api::{LoraApiBuilder, RegistryLookupResult};
pub use error::{ContainerError, ErrorKind, LoraError, Result};
pub use hashing::{compute_hash, ContentHash, HashVariant};
pub use registry::{CivitaiClient, DynModelRegistry, ModelRegistry, RegistryLookup};
pub use resolver::{PathResolver, ResolvedPath};
pub use safetensors::{parse_metadata, MetadataDocument};

use std::path::Path;
use std::sync::Arc;

/// Main API struct for LoRA viewer operations.
///
/// Cheap to clone; clones share the resolver and the registry client, and
/// each call runs as an independent pipeline.
#[derive(Clone)]
pub struct LoraApi {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    resolver: PathResolver,
    registry: DynModelRegistry,
}

impl LoraApi {
    /// Create a builder for LoraApi.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let api = LoraApi::builder("/srv/models/lora")
    ///     .registry_url("http://localhost:9000/api/v1")
    ///     .request_timeout(Duration::from_secs(10))
    ///     .build()?;
    /// ```
    pub fn builder(lora_root: impl Into<std::path::PathBuf>) -> LoraApiBuilder {
        LoraApiBuilder::new(lora_root)
    }

    /// Create a LoraApi backed by the public Civitai API.
    ///
    /// # Arguments
    ///
    /// * `lora_root` - Directory every identifier is resolved against
    pub fn new(lora_root: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::builder(lora_root).build()
    }

    /// The normalized LoRA root directory.
    pub fn lora_root(&self) -> &Path {
        self.inner.resolver.root()
    }

    /// The registry consulted by [`LoraApi::lookup_registry`].
    pub fn registry_id(&self) -> &'static str {
        self.inner.registry.id()
    }
}

impl std::fmt::Debug for LoraApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoraApi")
            .field("lora_root", &self.lora_root())
            .field("registry", &self.registry_id())
            .finish()
    }
}
