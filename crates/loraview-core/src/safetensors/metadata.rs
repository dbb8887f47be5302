//! Extraction of the `__metadata__` document from a safetensors header.
//!
//! Only the JSON header is decoded; the tensor payload that follows it is
//! never inspected.

use super::header::ContainerHeader;
use crate::config::ContainerConfig;
use crate::error::ContainerError;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// The nested metadata object of a LoRA file.
pub type MetadataDocument = Map<String, Value>;

/// Parse the metadata document embedded in a safetensors container.
///
/// Fails when the container is malformed, when the header has no
/// `__metadata__` key, or when that key does not hold a JSON object. A
/// missing document is never reported as an empty one.
pub fn parse_metadata(bytes: &[u8]) -> Result<MetadataDocument, ContainerError> {
    let header = ContainerHeader::read(bytes).map_err(|e| {
        warn!("Rejected container header: {}", e);
        e
    })?;

    let text = std::str::from_utf8(&bytes[header.metadata_range()])
        .map_err(|e| ContainerError::InvalidUtf8(e.to_string()))?;

    let document: Value = serde_json::from_str(text).map_err(|e| {
        let snippet = truncate_chars(text, ContainerConfig::SNIPPET_CHARS);
        warn!(snippet = %snippet, "Failed to parse metadata JSON: {}", e);
        ContainerError::InvalidJson {
            message: e.to_string(),
            snippet,
        }
    })?;

    let Value::Object(mut fields) = document else {
        return Err(ContainerError::HeaderNotObject);
    };

    let key = find_metadata_key(&fields).ok_or(ContainerError::MissingMetadata)?;
    match fields.remove(&key) {
        Some(Value::Object(metadata)) => {
            debug!("Extracted {} metadata entries", metadata.len());
            Ok(metadata)
        }
        _ => Err(ContainerError::MetadataNotObject),
    }
}

/// Locate the reserved key, ignoring ASCII case. An exact match wins.
fn find_metadata_key(fields: &Map<String, Value>) -> Option<String> {
    if fields.contains_key(ContainerConfig::METADATA_KEY) {
        return Some(ContainerConfig::METADATA_KEY.to_string());
    }
    fields
        .keys()
        .find(|k| k.eq_ignore_ascii_case(ContainerConfig::METADATA_KEY))
        .cloned()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
