//! Upload history records and the history overwrite law.

use serde::{Deserialize, Serialize};

/// A single uploaded image.
///
/// Records are identified by the `(name, date)` pair. Two records sharing
/// both are a benign duplicate, not an error; no surrogate key exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub name: String,
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// Upload timestamp, RFC 3339.
    pub date: String,
    /// Path of the file inside the storage repository.
    pub path: String,
}

impl UploadRecord {
    /// The identifying pair for this record.
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.date)
    }
}

/// Parse a stored or remote history document.
///
/// A document that is not an array of records yields `None` instead of an
/// error; callers treat that the same as an absent blob.
pub fn parse_history(text: &str) -> Option<Vec<UploadRecord>> {
    serde_json::from_str(text).ok()
}

/// History overwrite law: a non-empty remote log fully replaces the local
/// log; an empty remote log leaves the local log untouched so a fresh remote
/// never wipes a richer local history on first sync.
pub fn reconcile_history(local: Vec<UploadRecord>, remote: Vec<UploadRecord>) -> Vec<UploadRecord> {
    if remote.is_empty() {
        local
    } else {
        remote
    }
}
