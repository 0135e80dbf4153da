//! Closed taxonomy for remote sync failures.

use serde::{Deserialize, Serialize};

/// Category of a failed remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncFailureKind {
    /// The credential is invalid or has expired.
    Authentication,
    /// The credential lacks a required scope.
    Permission,
    /// The referenced gist, repository, or branch is absent.
    NotFound,
    /// The remote service is throttling requests.
    RateLimit,
    /// Anything that fits no other category.
    Unknown,
}

impl SyncFailureKind {
    /// Remediation text shown to the user when an operation fails.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::Authentication => {
                "GitHub authentication failed. Check that your access token is valid and has not expired."
            }
            Self::Permission => {
                "The access token is missing a required permission. Recreate it with the gist and repo scopes enabled."
            }
            Self::NotFound => {
                "The requested gist, repository, or branch does not exist. Verify the repository settings."
            }
            Self::RateLimit => {
                "GitHub is rate limiting this account. Wait a few minutes and try again."
            }
            Self::Unknown => "Sync failed due to an unexpected error.",
        }
    }
}

/// Classify an HTTP failure into the taxonomy.
///
/// GitHub reports throttling both as 429 and as 403 with an explanatory
/// message, so the body is consulted for the 403 case.
pub fn classify_http_failure(status: u16, message: &str) -> SyncFailureKind {
    match status {
        401 => SyncFailureKind::Authentication,
        403 if message.to_ascii_lowercase().contains("rate limit") => SyncFailureKind::RateLimit,
        403 => SyncFailureKind::Permission,
        404 => SyncFailureKind::NotFound,
        429 => SyncFailureKind::RateLimit,
        _ => SyncFailureKind::Unknown,
    }
}
