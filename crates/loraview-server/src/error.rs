//! HTTP error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loraview_core::{ErrorKind, LoraError};
use serde::Serialize;
use tracing::{error, warn};

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error returned by request handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::Security => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Format => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: None,
        }
    }
}

impl From<LoraError> for ApiError {
    fn from(err: LoraError) -> Self {
        let kind = err.kind();
        match kind {
            ErrorKind::Internal | ErrorKind::Upstream => {
                error!(kind = %kind, "Request failed: {}", err)
            }
            ErrorKind::Input | ErrorKind::Security | ErrorKind::NotFound | ErrorKind::Format => {
                warn!(kind = %kind, "Request rejected: {}", err)
            }
        }

        Self {
            status: status_for(kind),
            message: err.public_message(),
            detail: err.public_detail(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        warn!("Rejected request body: {}", rejection.body_text());

        Self {
            status,
            message: if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
                "Expected a JSON request body".to_string()
            } else {
                "Invalid request body".to_string()
            },
            detail: Some(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loraview_core::ContainerError;
    use std::path::PathBuf;

    #[test]
    fn test_status_table() {
        assert_eq!(status_for(ErrorKind::Input), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Security), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Format), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::Upstream), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_lora_error() {
        let err = ApiError::from(LoraError::AccessDenied {
            identifier: ".".into(),
            resolved: PathBuf::from("/srv/loras"),
        });
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(!err.message.contains("/srv/loras"));

        let err = ApiError::from(LoraError::Format(ContainerError::MissingMetadata));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.detail.as_deref(),
            Some("'__metadata__' field not found in header")
        );
    }

    #[test]
    fn test_upstream_detail_carries_status() {
        let err = ApiError::from(LoraError::Upstream {
            message: "HTTP 503: maintenance".into(),
            status_code: Some(503),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(!err.message.contains("maintenance"));
        assert_eq!(
            err.detail.as_deref(),
            Some("registry responded with status 503")
        );
    }
}
