//! Centralized configuration for the LoRA viewer.
//!
//! Compile-time limits for container parsing and defaults for the registry
//! client. Runtime values (root directory, registry URL) are supplied
//! through [`crate::LoraApiBuilder`].

use std::time::Duration;

/// Safetensors container layout and parsing limits.
pub struct ContainerConfig;

impl ContainerConfig {
    /// Width of the little-endian header length prefix.
    pub const HEADER_LEN_BYTES: usize = 8;
    /// Sanity cap on the metadata header size (50 MiB).
    pub const MAX_METADATA_SIZE: u64 = 50 * 1024 * 1024;
    /// Reserved key holding the human-relevant metadata.
    pub const METADATA_KEY: &'static str = "__metadata__";
    /// Characters of an unparseable header kept for diagnostics.
    pub const SNIPPET_CHARS: usize = 200;
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CIVITAI_API_BASE: &'static str = "https://civitai.com/api/v1";
    pub const USER_AGENT: &'static str = concat!("loraview/", env!("CARGO_PKG_VERSION"));
    /// Characters of an upstream error body kept for diagnostics.
    pub const ERROR_BODY_CHARS: usize = 500;
}
