//! JSON-file implementation of the local persistence contract.
//!
//! Keeps the two local documents (hosting settings and upload history) as
//! pretty-printed JSON files under one directory. Missing or malformed
//! documents degrade to defaults so a corrupt cache never blocks a sync
//! attempt.

use async_trait::async_trait;
use log::warn;
use std::path::{Path, PathBuf};
use tokio::fs;

use picvault_core::history::{parse_history, UploadRecord};
use picvault_core::settings::HostingSettings;
use picvault_core::store::LocalStore;

const SETTINGS_FILENAME: &str = "settings.json";
const HISTORY_FILENAME: &str = "upload-history.json";

/// File-backed [`LocalStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    settings_path: PathBuf,
    history_path: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings_path: dir.join(SETTINGS_FILENAME),
            history_path: dir.join(HISTORY_FILENAME),
        }
    }

    /// Store rooted at the platform config directory, when one exists.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("picvault")))
    }

    async fn read_document(path: &Path) -> Option<String> {
        match fs::read_to_string(path).await {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                None
            }
        }
    }

    async fn write_document(path: &Path, content: &str) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("Failed to create {}: {}", parent.display(), err))?;
        }
        fs::write(path, content)
            .await
            .map_err(|err| format!("Failed to write {}: {}", path.display(), err))
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn load_settings(&self) -> Result<HostingSettings, String> {
        let Some(text) = Self::read_document(&self.settings_path).await else {
            return Ok(HostingSettings::default());
        };
        match HostingSettings::from_json(&text) {
            // The persisted copy should already be credential-free; strip
            // again so a hand-edited file cannot smuggle a token in.
            Some(settings) => Ok(settings.stripped()),
            None => {
                warn!(
                    "Stored settings at {} are malformed; using defaults",
                    self.settings_path.display()
                );
                Ok(HostingSettings::default())
            }
        }
    }

    async fn save_settings(&self, settings: &HostingSettings) -> Result<(), String> {
        let content = serde_json::to_string_pretty(&settings.stripped())
            .map_err(|err| format!("Failed to serialize settings: {}", err))?;
        Self::write_document(&self.settings_path, &content).await
    }

    async fn load_history(&self) -> Result<Vec<UploadRecord>, String> {
        let Some(text) = Self::read_document(&self.history_path).await else {
            return Ok(Vec::new());
        };
        match parse_history(&text) {
            Some(history) => Ok(history),
            None => {
                warn!(
                    "Stored history at {} is malformed; using an empty log",
                    self.history_path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    async fn save_history(&self, history: &[UploadRecord]) -> Result<(), String> {
        let content = serde_json::to_string_pretty(history)
            .map_err(|err| format!("Failed to serialize history: {}", err))?;
        Self::write_document(&self.history_path, &content).await
    }
}
