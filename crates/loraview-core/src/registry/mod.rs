//! External model registries queried by content hash.
//!
//! The registry is a capability injected into [`crate::LoraApi`]; the
//! production implementation is [`CivitaiClient`].

mod civitai;

pub use civitai::CivitaiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of a hash lookup that reached the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryLookup {
    /// The registry knows this hash; the record is passed through untouched.
    Found(Value),
    /// The registry answered and does not know this hash.
    NotFound,
}

/// A registry that can identify model files by content hash.
///
/// Implementations hold no per-request state and are shared across
/// concurrent requests.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Short identifier used in logs (e.g., "civitai").
    fn id(&self) -> &'static str;

    /// Look up a lowercase hex SHA256 digest.
    ///
    /// A confirmed absence is `Ok(RegistryLookup::NotFound)`. Transport
    /// failures, timeouts and unparseable answers are errors.
    async fn lookup_by_hash(&self, hash: &str) -> Result<RegistryLookup>;
}

/// Shared handle to a registry implementation.
pub type DynModelRegistry = Arc<dyn ModelRegistry>;
