//! Hosting settings model and the settings merge law.

use serde::{Deserialize, Serialize};

/// User-configurable hosting settings.
///
/// The persisted and remotely synced copies never carry `token`; the session
/// credential lives only in memory for the lifetime of the session. Call
/// [`HostingSettings::stripped`] before any copy leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostingSettings {
    /// Session access token. Absent on every persisted or pushed copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Owner of the storage repository.
    pub owner: String,
    /// Name of the storage repository.
    pub repo: String,
    /// Branch uploads are committed to.
    pub branch: String,
    /// Directory inside the repository that receives uploads.
    pub path: String,
    /// UI language tag.
    pub language: String,
    /// Custom domain used when building image URLs, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    /// Whether gist synchronization is enabled.
    pub enable_sync: bool,
}

impl Default for HostingSettings {
    fn default() -> Self {
        Self {
            token: None,
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            path: "images".to_string(),
            language: "zh".to_string(),
            custom_domain: None,
            enable_sync: false,
        }
    }
}

impl HostingSettings {
    /// Copy of these settings with the credential removed.
    pub fn stripped(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    /// Parse a stored or remote settings document.
    ///
    /// Missing fields fall back to their defaults; a document that is not a
    /// settings object at all yields `None` instead of an error.
    pub fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

/// Settings merge law: the remote copy wins for every field except the
/// credential, which is always the current session token.
pub fn merge_remote_settings(remote: HostingSettings, session_token: &str) -> HostingSettings {
    HostingSettings {
        token: Some(session_token.to_string()),
        ..remote
    }
}
