//! Observable sync engine status.

use serde::{Deserialize, Serialize};

/// Snapshot of the sync engine for one session.
///
/// Created in the uninitialized state at session start, mutated only by the
/// orchestrator, and discarded with the session; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Whether a remote record has been located and local state reconciled.
    pub is_initialized: bool,
    /// Whether a sync operation is currently in flight.
    pub is_syncing: bool,
    /// Completion time of the last successful operation, RFC 3339.
    pub last_synced: Option<String>,
    /// Id of the remote record once located or created.
    pub remote_id: Option<String>,
    /// Remediation text for the most recent failure, if any.
    pub error: Option<String>,
}
