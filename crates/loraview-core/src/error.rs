//! Error types for the LoRA viewer library.
//!
//! Every failure is a [`LoraError`] variant, and every variant belongs to
//! exactly one [`ErrorKind`]. Callers branch on the kind, never on the
//! message text.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Reasons a byte buffer does not conform to the safetensors container layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("file is too short: {len} bytes, expected at least 8 for the header length")]
    TooShort { len: usize },

    #[error("reported metadata size is 0")]
    EmptyHeader,

    #[error("reported metadata size ({size} bytes) exceeds the {max} byte limit")]
    HeaderTooLarge { size: u64, max: u64 },

    #[error("file is truncated: header needs {expected} bytes, file has {actual}")]
    Truncated { expected: u64, actual: u64 },

    #[error("metadata header is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("metadata header is not valid JSON: {message}")]
    InvalidJson {
        message: String,
        /// Leading characters of the offending text, for logs only.
        snippet: String,
    },

    #[error("metadata header is not a JSON object")]
    HeaderNotObject,

    #[error("'__metadata__' field not found in header")]
    MissingMetadata,

    #[error("'__metadata__' field is not a JSON object")]
    MetadataNotObject,
}

/// Closed classification of failures, used to choose externally visible outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request or identifier.
    Input,
    /// Identifier resolved outside the root directory.
    Security,
    /// The referenced file does not exist.
    NotFound,
    /// Container bytes do not match the expected structure.
    Format,
    /// Registry unreachable, timed out, or answered with garbage.
    Upstream,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Input => "input",
            ErrorKind::Security => "security",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Format => "format",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the LoRA viewer library.
#[derive(Debug, Error)]
pub enum LoraError {
    // Request validation
    #[error("Invalid LoRA identifier: {reason}")]
    InvalidIdentifier { reason: String },

    #[error("Invalid request: {message}")]
    InvalidParams { message: String },

    #[error("Cannot hash file: {0}")]
    InvalidHashInput(#[source] ContainerError),

    // Path containment
    #[error("Access denied: LoRA identifier resolves outside the allowed directory")]
    AccessDenied {
        identifier: String,
        resolved: PathBuf,
    },

    #[error("LoRA file not found: {identifier}")]
    FileNotFound { identifier: String },

    // Container format
    #[error("Invalid safetensors container: {0}")]
    Format(#[from] ContainerError),

    // Registry
    #[error("Registry error: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Registry request timed out after {0:?}")]
    Timeout(Duration),

    // File system
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for LoRA viewer operations.
pub type Result<T> = std::result::Result<T, LoraError>;

impl LoraError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        LoraError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoraError::InvalidIdentifier { .. }
            | LoraError::InvalidParams { .. }
            | LoraError::InvalidHashInput(_) => ErrorKind::Input,

            LoraError::AccessDenied { .. } => ErrorKind::Security,

            LoraError::FileNotFound { .. } => ErrorKind::NotFound,

            LoraError::Format(_) => ErrorKind::Format,

            LoraError::Upstream { .. } | LoraError::Timeout(_) => ErrorKind::Upstream,

            LoraError::Io { .. }
            | LoraError::Config { .. }
            | LoraError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to a remote caller.
    ///
    /// Internal and upstream failures collapse to a fixed sentence; the
    /// full error only goes to the log.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Input | ErrorKind::Security | ErrorKind::NotFound => self.to_string(),
            ErrorKind::Format => "Failed to parse metadata from the safetensors file. \
                 The file might be invalid, not a LoRA, or corrupted."
                .to_string(),
            ErrorKind::Upstream => "The model registry could not be queried.".to_string(),
            ErrorKind::Internal => "An unexpected error occurred on the server.".to_string(),
        }
    }

    /// Optional extra detail safe to show to a remote caller.
    pub fn public_detail(&self) -> Option<String> {
        match self {
            // The JSON snippet stays in the logs.
            LoraError::Format(ContainerError::InvalidJson { message, .. }) => {
                Some(format!("metadata header is not valid JSON: {}", message))
            }
            LoraError::Format(inner) => Some(inner.to_string()),
            LoraError::Upstream {
                status_code: Some(code),
                ..
            } => Some(format!("registry responded with status {}", code)),
            LoraError::Timeout(after) => Some(format!("registry timed out after {:?}", after)),
            _ => None,
        }
    }
}
