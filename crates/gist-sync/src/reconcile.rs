//! Pull/push reconcilers for the two synced blobs.

use log::warn;
use std::collections::HashMap;

use picvault_core::history::{parse_history, UploadRecord};
use picvault_core::settings::HostingSettings;

use crate::error::Result;
use crate::locator::{CONFIG_FILENAME, HISTORY_FILENAME};
use crate::ports::RemoteStore;

/// Fetch the remote settings blob.
///
/// An absent or malformed blob yields `None`; the caller keeps its local
/// settings in that case.
pub async fn pull_settings(
    remote: &dyn RemoteStore,
    token: &str,
    record_id: &str,
) -> Result<Option<HostingSettings>> {
    let blobs = remote.fetch_record(token, record_id).await?;
    let Some(text) = blobs.get(CONFIG_FILENAME) else {
        return Ok(None);
    };
    let parsed = HostingSettings::from_json(text);
    if parsed.is_none() {
        warn!("Remote config blob is malformed; keeping local settings");
    }
    Ok(parsed)
}

/// Write the settings blob, always credential-stripped.
pub async fn push_settings(
    remote: &dyn RemoteStore,
    token: &str,
    record_id: &str,
    settings: &HostingSettings,
) -> Result<()> {
    let content = serde_json::to_string_pretty(&settings.stripped())?;
    let mut files = HashMap::new();
    files.insert(CONFIG_FILENAME.to_string(), content);
    remote.update_record(token, record_id, files).await
}

/// Fetch the remote history blob.
///
/// An absent or malformed blob yields the empty log.
pub async fn pull_history(
    remote: &dyn RemoteStore,
    token: &str,
    record_id: &str,
) -> Result<Vec<UploadRecord>> {
    let blobs = remote.fetch_record(token, record_id).await?;
    let Some(text) = blobs.get(HISTORY_FILENAME) else {
        return Ok(Vec::new());
    };
    match parse_history(text) {
        Some(records) => Ok(records),
        None => {
            warn!("Remote history blob is malformed; treating it as empty");
            Ok(Vec::new())
        }
    }
}

/// Overwrite the remote history blob with the complete local log.
pub async fn push_history(
    remote: &dyn RemoteStore,
    token: &str,
    record_id: &str,
    history: &[UploadRecord],
) -> Result<()> {
    let content = serde_json::to_string_pretty(history)?;
    let mut files = HashMap::new();
    files.insert(HISTORY_FILENAME.to_string(), content);
    remote.update_record(token, record_id, files).await
}
