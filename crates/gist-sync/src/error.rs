//! Error types for the gist sync crate.

use picvault_core::sync::{classify_http_failure, SyncFailureKind};
use thiserror::Error;

/// Result type alias for gist sync operations.
pub type Result<T> = std::result::Result<T, GistSyncError>;

/// Errors that can occur during gist sync operations.
#[derive(Debug, Error)]
pub enum GistSyncError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API error response from GitHub
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication error (missing or invalid token)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid request (missing required data, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Local persistence adapter failure
    #[error("Local store error: {0}")]
    Local(String),
}

impl GistSyncError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a local store error
    pub fn local(message: impl Into<String>) -> Self {
        Self::Local(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify this error into the failure taxonomy.
    ///
    /// This is the single mapping point; the locator and reconcilers raise
    /// raw errors and the orchestrator classifies them once.
    pub fn failure_kind(&self) -> SyncFailureKind {
        match self {
            Self::Api { status, message } => classify_http_failure(*status, message),
            Self::Auth(_) => SyncFailureKind::Authentication,
            Self::Http(_) | Self::Json(_) | Self::InvalidRequest(_) | Self::Local(_) => {
                SyncFailureKind::Unknown
            }
        }
    }

    /// Remediation text suitable for display.
    ///
    /// Categorized failures get the fixed remediation string; the generic
    /// fallback carries the underlying message so it stays actionable.
    pub fn user_message(&self) -> String {
        match self.failure_kind() {
            SyncFailureKind::Unknown => format!("Sync failed: {}", self),
            kind => kind.remediation().to_string(),
        }
    }
}
