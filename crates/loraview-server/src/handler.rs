//! Request handlers.

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use loraview_core::naming::lora_display_name;
use loraview_core::{MetadataDocument, RegistryLookupResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Body accepted by both LoRA endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoraRequest {
    #[serde(default, alias = "LoraIdentifier")]
    pub lora_identifier: Option<String>,
}

/// Response of `POST /metadata`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub local_metadata: MetadataDocument,
    pub lora_name: String,
    pub identifier_received: String,
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Extract the LoRA identifier from a request body.
fn require_identifier(
    payload: Result<Json<LoraRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(request) = payload?;
    match request.lora_identifier {
        Some(identifier) if !identifier.trim().is_empty() => Ok(identifier),
        _ => Err(ApiError::bad_request("LoRA identifier is required")),
    }
}

/// `POST /metadata`
pub async fn handle_metadata(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoraRequest>, JsonRejection>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let identifier = require_identifier(payload)?;
    debug!(identifier = %identifier, "Metadata request");

    let local_metadata = state.api.get_metadata(&identifier).await?;

    Ok(Json(MetadataResponse {
        local_metadata,
        lora_name: lora_display_name(&identifier),
        identifier_received: identifier,
    }))
}

/// `POST /registry-lookup`
pub async fn handle_registry_lookup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoraRequest>, JsonRejection>,
) -> Result<Json<RegistryLookupResult>, ApiError> {
    let identifier = require_identifier(payload)?;
    debug!(identifier = %identifier, "Registry lookup request");

    let result = state.api.lookup_registry(&identifier).await?;
    Ok(Json(result))
}
