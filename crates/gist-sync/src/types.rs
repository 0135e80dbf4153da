//! Wire types for the GitHub gist and repository endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gist entry as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GistSummary {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: HashMap<String, GistFileStub>,
}

/// File metadata inside a gist listing; the list endpoint carries no content.
#[derive(Debug, Clone, Deserialize)]
pub struct GistFileStub {
    pub filename: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Full gist as returned by the get, create, and update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GistDetail {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: HashMap<String, GistFile>,
}

/// A gist file with inline content.
///
/// GitHub omits or truncates `content` for large files; such blobs are
/// treated as absent.
#[derive(Debug, Clone, Deserialize)]
pub struct GistFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub truncated: Option<bool>,
}

/// Request body for creating the sync gist.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGistRequest {
    pub description: String,
    pub public: bool,
    pub files: HashMap<String, GistFileContent>,
}

/// File payload for gist create/update requests.
#[derive(Debug, Clone, Serialize)]
pub struct GistFileContent {
    pub content: String,
}

/// Authenticated user identity, used for the pre-creation token check.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}

/// Error body GitHub returns for failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// Repository metadata for the storage access check.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySummary {
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
}

/// Branch entry from the branch list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchSummary {
    pub name: String,
}
