//! Builder for configuring LoraApi initialization.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::NetworkConfig;
use crate::error::Result;
use crate::registry::{CivitaiClient, DynModelRegistry};
use crate::resolver::PathResolver;
use crate::{ApiInner, LoraApi};

/// Builder for configuring LoraApi initialization.
///
/// # Example
///
/// ```rust,ignore
/// use loraview_core::LoraApi;
///
/// let api = LoraApi::builder("/srv/models/lora")
///     .request_timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub struct LoraApiBuilder {
    lora_root: PathBuf,
    registry_url: String,
    request_timeout: Duration,
    registry: Option<DynModelRegistry>,
}

impl LoraApiBuilder {
    /// Create a new builder with the LoRA root directory.
    pub fn new(lora_root: impl Into<PathBuf>) -> Self {
        Self {
            lora_root: lora_root.into(),
            registry_url: NetworkConfig::CIVITAI_API_BASE.to_string(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            registry: None,
        }
    }

    /// Base URL of the Civitai-compatible registry API.
    ///
    /// Default: `https://civitai.com/api/v1`
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = url.into();
        self
    }

    /// Timeout applied to each registry request.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Use an existing registry implementation instead of building a
    /// [`CivitaiClient`]. Overrides `registry_url` and `request_timeout`.
    pub fn with_registry(mut self, registry: DynModelRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the LoraApi instance.
    pub fn build(self) -> Result<LoraApi> {
        let resolver = PathResolver::new(self.lora_root)?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(CivitaiClient::with_config(
                &self.registry_url,
                self.request_timeout,
            )?),
        };

        tracing::info!(
            "LoRA API ready (root: {}, registry: {})",
            resolver.root().display(),
            registry.id()
        );

        Ok(LoraApi {
            inner: Arc::new(ApiInner { resolver, registry }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoraError;
    use tempfile::TempDir;

    #[test]
    fn test_build_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let api = LoraApiBuilder::new(temp_dir.path()).build().unwrap();
        assert_eq!(api.lora_root(), temp_dir.path());
        assert_eq!(api.registry_id(), "civitai");
    }

    #[test]
    fn test_build_fails_for_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = LoraApiBuilder::new(temp_dir.path().join("nope")).build();
        assert!(matches!(result, Err(LoraError::Config { .. })));
    }

    #[test]
    fn test_build_fails_for_bad_registry_url() {
        let temp_dir = TempDir::new().unwrap();
        let result = LoraApiBuilder::new(temp_dir.path())
            .registry_url("civitai.com")
            .build();
        assert!(matches!(result, Err(LoraError::Config { .. })));
    }
}
