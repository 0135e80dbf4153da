//! GitHub REST client for the gist-backed sync store.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{GistSyncError, Result};
use crate::ports::RemoteStore;
use crate::types::{
    ApiErrorResponse, AuthenticatedUser, BranchSummary, CreateGistRequest, GistDetail,
    GistFileContent, GistSummary, RepositorySummary,
};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;
/// GitHub rejects requests without a User-Agent.
const CLIENT_USER_AGENT: &str = "picvault-sync";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
/// Gist listings page at 30 by default; one large page covers any realistic
/// account without pagination plumbing.
const LIST_PAGE_SIZE: u32 = 100;

/// Public GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Client for the GitHub REST API surface the sync engine needs: gists for
/// the tagged-document store, plus the repository endpoints backing the
/// storage access check.
#[derive(Debug, Clone)]
pub struct GistClient {
    client: reqwest::Client,
    base_url: String,
}

impl GistClient {
    /// Create a new client against the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base, e.g. [`GITHUB_API_URL`]; tests point this at
    ///   a local mock server.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client against the public GitHub API.
    pub fn github() -> Self {
        Self::new(GITHUB_API_URL)
    }

    /// Create headers for an API request.
    fn headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GistSyncError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            // GitHub wraps failures in {"message": ...}
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(GistSyncError::api(status.as_u16(), error.message));
            }
            return Err(GistSyncError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            GistSyncError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// Get the authenticated user behind the token.
    ///
    /// GET /user
    pub async fn get_authenticated_user(&self, token: &str) -> Result<AuthenticatedUser> {
        let url = format!("{}/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List the account's gists.
    ///
    /// GET /gists
    pub async fn list_gists(&self, token: &str) -> Result<Vec<GistSummary>> {
        let url = format!("{}/gists", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .query(&[("per_page", LIST_PAGE_SIZE.to_string())])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Get a gist with file contents inline.
    ///
    /// GET /gists/{gistId}
    pub async fn get_gist(&self, token: &str, gist_id: &str) -> Result<GistDetail> {
        let url = format!("{}/gists/{}", self.base_url, gist_id);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a gist.
    ///
    /// POST /gists
    pub async fn create_gist(&self, token: &str, request: &CreateGistRequest) -> Result<GistDetail> {
        let url = format!("{}/gists", self.base_url);
        debug!("Creating gist: {}", request.description);

        let response = self
            .client
            .post(&url)
            .headers(self.headers(token)?)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update files of an existing gist.
    ///
    /// PATCH /gists/{gistId}
    pub async fn update_gist(
        &self,
        token: &str,
        gist_id: &str,
        files: &HashMap<String, GistFileContent>,
    ) -> Result<GistDetail> {
        let url = format!("{}/gists/{}", self.base_url, gist_id);

        let response = self
            .client
            .patch(&url)
            .headers(self.headers(token)?)
            .json(&serde_json::json!({ "files": files }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Get a repository.
    ///
    /// GET /repos/{owner}/{repo}
    pub async fn get_repository(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<RepositorySummary> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List a repository's branches.
    ///
    /// GET /repos/{owner}/{repo}/branches
    pub async fn list_branches(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<BranchSummary>> {
        let url = format!("{}/repos/{}/{}/branches", self.base_url, owner, repo);

        let response = self
            .client
            .get(&url)
            .headers(self.headers(token)?)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}

#[async_trait]
impl RemoteStore for GistClient {
    async fn verify_identity(&self, token: &str) -> Result<String> {
        Ok(self.get_authenticated_user(token).await?.login)
    }

    async fn list_records(&self, token: &str) -> Result<Vec<GistSummary>> {
        self.list_gists(token).await
    }

    async fn create_record(&self, token: &str, request: CreateGistRequest) -> Result<String> {
        Ok(self.create_gist(token, &request).await?.id)
    }

    async fn fetch_record(
        &self,
        token: &str,
        record_id: &str,
    ) -> Result<HashMap<String, String>> {
        let gist = self.get_gist(token, record_id).await?;
        let mut blobs = HashMap::new();
        for (name, file) in gist.files {
            if file.truncated.unwrap_or(false) {
                warn!("Gist file {} is truncated; treating it as absent", name);
                continue;
            }
            if let Some(content) = file.content {
                blobs.insert(name, content);
            }
        }
        Ok(blobs)
    }

    async fn update_record(
        &self,
        token: &str,
        record_id: &str,
        files: HashMap<String, String>,
    ) -> Result<()> {
        let patch = files
            .into_iter()
            .map(|(name, content)| (name, GistFileContent { content }))
            .collect();
        self.update_gist(token, record_id, &patch).await?;
        Ok(())
    }
}
