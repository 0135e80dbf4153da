//! Locate-or-create for the account's sync gist.

use log::{debug, info};
use std::collections::HashMap;

use picvault_core::history::UploadRecord;
use picvault_core::settings::HostingSettings;

use crate::error::{GistSyncError, Result};
use crate::ports::RemoteStore;
use crate::types::{CreateGistRequest, GistFileContent};

/// Description that tags the account's sync gist.
pub const GIST_DESCRIPTION: &str = "PicVault Configuration";
/// Blob holding the hosting settings.
pub const CONFIG_FILENAME: &str = "picvault-config.json";
/// Blob holding the upload history.
pub const HISTORY_FILENAME: &str = "upload-history.json";

/// Find the sync gist for this account.
///
/// Returns the first gist in listing order tagged with [`GIST_DESCRIPTION`]
/// and carrying the config blob. Stray duplicates are tolerated; the first
/// match wins deterministically.
pub async fn locate_record(remote: &dyn RemoteStore, token: &str) -> Result<Option<String>> {
    let gists = remote.list_records(token).await?;
    let found = gists.into_iter().find(|gist| {
        gist.description.as_deref() == Some(GIST_DESCRIPTION)
            && gist.files.contains_key(CONFIG_FILENAME)
    });

    match &found {
        Some(gist) => debug!("Found sync gist {}", gist.id),
        None => debug!("No sync gist found for this account"),
    }
    Ok(found.map(|gist| gist.id))
}

/// Create the sync gist seeded from current local state.
///
/// The token is verified against the identity endpoint first so an invalid
/// credential surfaces as an authentication failure rather than a creation
/// failure. The seeded settings are credential-stripped; an empty history is
/// allowed.
pub async fn create_seeded_record(
    remote: &dyn RemoteStore,
    token: &str,
    settings: &HostingSettings,
    history: &[UploadRecord],
) -> Result<String> {
    let login = remote.verify_identity(token).await.map_err(|err| match err {
        GistSyncError::Api {
            status: 401,
            message,
        } => GistSyncError::auth(format!("Token rejected by GitHub: {}", message)),
        other => other,
    })?;
    debug!("Verified GitHub user {}", login);

    let mut files = HashMap::new();
    files.insert(
        CONFIG_FILENAME.to_string(),
        GistFileContent {
            content: serde_json::to_string_pretty(&settings.stripped())?,
        },
    );
    files.insert(
        HISTORY_FILENAME.to_string(),
        GistFileContent {
            content: serde_json::to_string_pretty(history)?,
        },
    );

    let record_id = remote
        .create_record(
            token,
            CreateGistRequest {
                description: GIST_DESCRIPTION.to_string(),
                public: false,
                files,
            },
        )
        .await?;
    info!("Created sync gist {}", record_id);
    Ok(record_id)
}
