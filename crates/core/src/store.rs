//! Local persistence contract consumed by the sync engine.

use async_trait::async_trait;

use crate::history::UploadRecord;
use crate::settings::HostingSettings;

/// Adapter over the local persistence layer.
///
/// Implementations own the two persisted documents: the hosting settings
/// (credential field absent) and the upload history. Loads degrade to
/// defaults on missing or malformed data so a corrupt cache never blocks a
/// sync attempt; errors are reserved for real I/O failures.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn load_settings(&self) -> Result<HostingSettings, String>;
    async fn save_settings(&self, settings: &HostingSettings) -> Result<(), String>;
    async fn load_history(&self) -> Result<Vec<UploadRecord>, String>;
    async fn save_history(&self, history: &[UploadRecord]) -> Result<(), String>;
}
