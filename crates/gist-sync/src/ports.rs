//! Port over the remote tagged-document store.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{CreateGistRequest, GistSummary};

/// Remote document store consumed by the locator and reconcilers.
///
/// [`GistClient`](crate::GistClient) is the production implementation;
/// engine tests substitute an in-memory fake.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lightweight identity check proving the token is usable.
    async fn verify_identity(&self, token: &str) -> Result<String>;

    /// List the account's documents with their tags and blob names.
    async fn list_records(&self, token: &str) -> Result<Vec<GistSummary>>;

    /// Create a tagged document and return its id.
    async fn create_record(&self, token: &str, request: CreateGistRequest) -> Result<String>;

    /// Fetch a document's blobs as filename to UTF-8 text.
    async fn fetch_record(&self, token: &str, record_id: &str)
        -> Result<HashMap<String, String>>;

    /// Overwrite the given blobs of a document, leaving others untouched.
    async fn update_record(
        &self,
        token: &str,
        record_id: &str,
        files: HashMap<String, String>,
    ) -> Result<()>;
}
