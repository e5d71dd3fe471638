//! Client error types and result alias.

use reqwest::StatusCode;
use thiserror::Error;

/// Client result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types.
///
/// Remote failures carry a typed kind so callers can branch on the cause
/// instead of parsing log output.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Platform version {current} is below the required {required}")]
    VersionUnsupported { required: String, current: String },

    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Unexpected response shape: {0}")]
    Response(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Map a non-success HTTP response to an error kind.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(body),
            StatusCode::NOT_FOUND => Self::NotFound(body),
            StatusCode::CONFLICT => Self::Conflict(body),
            _ => Self::Api { status, body },
        }
    }

    /// True when the failure came from the remote API rather than transport.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Auth(_) | Self::NotFound(_) | Self::Conflict(_) | Self::Api { .. }
        )
    }
}
