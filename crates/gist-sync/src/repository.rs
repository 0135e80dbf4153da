//! Storage-repository access check used by the settings screen.

use log::debug;

use picvault_core::settings::HostingSettings;

use crate::client::GistClient;
use crate::error::{GistSyncError, Result};

/// Verify the configured storage repository and branch are reachable with
/// the given token.
///
/// A missing repository surfaces as the API's 404; a configured branch that
/// does not exist is reported the same way, so callers get the not-found
/// remediation either way. Writing a probe file to the repository is the
/// upload path's concern, not this check's.
pub async fn check_repository_access(
    client: &GistClient,
    token: &str,
    settings: &HostingSettings,
) -> Result<()> {
    if settings.owner.is_empty() || settings.repo.is_empty() {
        return Err(GistSyncError::invalid_request(
            "Repository owner and name must be configured",
        ));
    }

    let repository = client
        .get_repository(token, &settings.owner, &settings.repo)
        .await?;
    debug!("Repository {} is reachable", repository.full_name);

    let branches = client
        .list_branches(token, &settings.owner, &settings.repo)
        .await?;
    if !branches.iter().any(|branch| branch.name == settings.branch) {
        return Err(GistSyncError::api(
            404,
            format!(
                "Branch '{}' does not exist in {}",
                settings.branch, repository.full_name
            ),
        ));
    }

    Ok(())
}
