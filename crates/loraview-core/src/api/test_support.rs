//! Fixtures shared by the API pipeline tests.

use crate::error::{LoraError, Result};
use crate::registry::{ModelRegistry, RegistryLookup};
use crate::LoraApi;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory registry that records every queried hash.
#[derive(Default)]
pub(crate) struct MockRegistry {
    records: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl MockRegistry {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn insert(&self, hash: &str, record: Value) {
        self.records.lock().unwrap().insert(hash.to_string(), record);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelRegistry for MockRegistry {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn lookup_by_hash(&self, hash: &str) -> Result<RegistryLookup> {
        self.calls.lock().unwrap().push(hash.to_string());
        if self.fail {
            return Err(LoraError::Upstream {
                message: "mock registry unavailable".into(),
                status_code: Some(503),
            });
        }
        Ok(match self.records.lock().unwrap().get(hash) {
            Some(record) => RegistryLookup::Found(record.clone()),
            None => RegistryLookup::NotFound,
        })
    }
}

/// Temporary LoRA root with a `styles/` subdirectory and an API over it.
pub(crate) fn setup(registry: MockRegistry) -> (TempDir, LoraApi, Arc<MockRegistry>) {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("styles")).unwrap();
    let registry = Arc::new(registry);
    let api = LoraApi::builder(temp_dir.path())
        .with_registry(registry.clone())
        .build()
        .unwrap();
    (temp_dir, api, registry)
}

/// Serialize `header` into a safetensors container followed by `payload`.
pub(crate) fn container(header: &Value, payload: &[u8]) -> Vec<u8> {
    let json = serde_json::to_vec(header).unwrap();
    let mut bytes = (json.len() as u64).to_le_bytes().to_vec();
    bytes.extend_from_slice(&json);
    bytes.extend_from_slice(payload);
    bytes
}
