//! Safetensors container handling.
//!
//! Layout: an 8-byte little-endian header length `N`, `N` bytes of UTF-8
//! JSON, then the opaque tensor payload.

mod header;
mod metadata;

pub use header::ContainerHeader;
pub use metadata::{parse_metadata, MetadataDocument};
