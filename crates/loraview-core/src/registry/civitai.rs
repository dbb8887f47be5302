//! Civitai model-version lookup by hash.
//!
//! Uses `GET {base}/model-versions/by-hash/{hash}`. A 404 means the hash is
//! unknown; anything else that is not a success is an upstream failure.

use super::{ModelRegistry, RegistryLookup};
use crate::config::NetworkConfig;
use crate::error::{LoraError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Client for the Civitai REST API.
#[derive(Debug, Clone)]
pub struct CivitaiClient {
    client: Client,
    /// API base without a trailing slash
    base_url: String,
    timeout: Duration,
}

impl CivitaiClient {
    /// Create a client for the public Civitai API with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_config(NetworkConfig::CIVITAI_API_BASE, NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a client for a custom API base URL and request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://civitai.com/api/v1`
    /// * `timeout` - Whole-request timeout applied to every lookup
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| LoraError::Config {
            message: format!("Invalid registry URL '{}': {}", base_url, e),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LoraError::Config {
                message: format!("Registry URL must be http or https: {}", base_url),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| LoraError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// URL of the by-hash endpoint for `hash`.
    pub fn by_hash_url(&self, hash: &str) -> String {
        format!(
            "{}/model-versions/by-hash/{}",
            self.base_url,
            hash.to_ascii_lowercase()
        )
    }

    fn validate_hash(hash: &str) -> Result<()> {
        if hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(())
        } else {
            Err(LoraError::InvalidParams {
                message: format!("Not a SHA256 hex digest: '{}'", hash),
            })
        }
    }
}

#[async_trait]
impl ModelRegistry for CivitaiClient {
    fn id(&self) -> &'static str {
        "civitai"
    }

    async fn lookup_by_hash(&self, hash: &str) -> Result<RegistryLookup> {
        Self::validate_hash(hash)?;
        let url = self.by_hash_url(hash);
        debug!("Querying Civitai: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Civitai request timed out for hash {}", hash);
                LoraError::Timeout(self.timeout)
            } else {
                error!("Civitai request failed for hash {}: {}", hash, e);
                LoraError::Upstream {
                    message: format!("Civitai request failed: {}", e),
                    status_code: None,
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("No model found on Civitai for hash {}", hash);
            return Ok(RegistryLookup::NotFound);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LoraError::Timeout(self.timeout)
            } else {
                LoraError::Upstream {
                    message: format!("Failed to read Civitai response: {}", e),
                    status_code: Some(status.as_u16()),
                }
            }
        })?;

        if !status.is_success() {
            let snippet: String = body.chars().take(NetworkConfig::ERROR_BODY_CHARS).collect();
            error!(
                status = status.as_u16(),
                body = %snippet,
                "Civitai API request failed for hash {}",
                hash
            );
            return Err(LoraError::Upstream {
                message: format!("Civitai API returned {}", status),
                status_code: Some(status.as_u16()),
            });
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(record @ Value::Object(_)) => {
                info!("Found Civitai record for hash {}", hash);
                Ok(RegistryLookup::Found(record))
            }
            Ok(_) => Err(LoraError::Upstream {
                message: "Civitai response is not a JSON object".to_string(),
                status_code: Some(status.as_u16()),
            }),
            Err(e) => {
                error!("Failed to parse Civitai response for hash {}: {}", hash, e);
                Err(LoraError::Upstream {
                    message: format!("Failed to parse Civitai response: {}", e),
                    status_code: Some(status.as_u16()),
                })
            }
        }
    }
}
