//! Sync orchestrator: the state machine over locator and reconcilers.

use chrono::Utc;
use log::{debug, warn};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use picvault_core::history::{reconcile_history, UploadRecord};
use picvault_core::settings::{merge_remote_settings, HostingSettings};
use picvault_core::store::LocalStore;
use picvault_core::sync::SyncStatus;

use crate::credentials::SessionCredential;
use crate::error::{GistSyncError, Result};
use crate::locator::{create_seeded_record, locate_record};
use crate::ports::RemoteStore;
use crate::reconcile::{pull_history, pull_settings, push_history, push_settings};

/// Orchestrates gist synchronization for one session.
///
/// Operations return `true` on success. Failures are classified once and
/// the remediation text is stored on the status snapshot; a failure never
/// demotes an initialized session. Remote mutations serialize on an
/// internal mutex so at most one is in flight at a time; a second caller
/// queues behind the first.
pub struct SyncEngine {
    remote: Arc<dyn RemoteStore>,
    local: Arc<dyn LocalStore>,
    credential: SessionCredential,
    status: RwLock<SyncStatus>,
    op_lock: Mutex<()>,
}

impl SyncEngine {
    pub fn new(remote: Arc<dyn RemoteStore>, local: Arc<dyn LocalStore>) -> Self {
        Self {
            remote,
            local,
            credential: SessionCredential::new(),
            status: RwLock::new(SyncStatus::default()),
            op_lock: Mutex::new(()),
        }
    }

    /// Read-only snapshot of the current sync status.
    pub fn status(&self) -> SyncStatus {
        self.status.read().expect("status lock poisoned").clone()
    }

    /// Initialize the session against the remote record.
    ///
    /// Locates the account's sync gist, creating it seeded from local state
    /// when absent, then pulls and merges settings and applies the history
    /// overwrite law. An empty token is a no-op returning `false` with no
    /// state change.
    pub async fn initialize(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            debug!("initialize called without a token");
            return false;
        }

        let _guard = self.op_lock.lock().await;
        self.credential.set(token);
        self.update_status(|status| {
            status.is_syncing = true;
            status.error = None;
        });

        match self.run_initialize(token).await {
            Ok(record_id) => {
                self.update_status(|status| {
                    status.is_initialized = true;
                    status.remote_id = Some(record_id);
                });
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(&err);
                false
            }
        }
    }

    /// Push the given settings to the remote record, credential stripped.
    pub async fn sync_settings(&self, settings: &HostingSettings) -> bool {
        let Some((token, record_id)) = self.ready_context() else {
            return false;
        };

        let _guard = self.op_lock.lock().await;
        self.update_status(|status| status.is_syncing = true);

        match push_settings(self.remote.as_ref(), &token, &record_id, settings).await {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(&err);
                false
            }
        }
    }

    /// Overwrite the remote history blob with the given log.
    pub async fn sync_history(&self, history: &[UploadRecord]) -> bool {
        let Some((token, record_id)) = self.ready_context() else {
            return false;
        };

        let _guard = self.op_lock.lock().await;
        self.update_status(|status| status.is_syncing = true);

        match push_history(self.remote.as_ref(), &token, &record_id, history).await {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(&err);
                false
            }
        }
    }

    /// Push current local settings and history to the remote record.
    pub async fn resync_all(&self) -> bool {
        let Some((token, record_id)) = self.ready_context() else {
            return false;
        };

        let _guard = self.op_lock.lock().await;
        self.update_status(|status| status.is_syncing = true);

        match self.run_resync(&token, &record_id).await {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(&err);
                false
            }
        }
    }

    async fn run_initialize(&self, token: &str) -> Result<String> {
        let record_id = match locate_record(self.remote.as_ref(), token).await? {
            Some(id) => id,
            None => {
                let settings = self.load_local_settings().await;
                let history = self.load_local_history().await;
                create_seeded_record(self.remote.as_ref(), token, &settings, &history).await?
            }
        };

        if let Some(remote_settings) =
            pull_settings(self.remote.as_ref(), token, &record_id).await?
        {
            let merged = merge_remote_settings(remote_settings, token);
            self.local
                .save_settings(&merged.stripped())
                .await
                .map_err(GistSyncError::local)?;
        }

        let remote_history = pull_history(self.remote.as_ref(), token, &record_id).await?;
        if remote_history.is_empty() {
            debug!("Remote history is empty; keeping the local log");
        } else {
            let merged = reconcile_history(self.load_local_history().await, remote_history);
            self.local
                .save_history(&merged)
                .await
                .map_err(GistSyncError::local)?;
        }

        Ok(record_id)
    }

    async fn run_resync(&self, token: &str, record_id: &str) -> Result<()> {
        let settings = self.load_local_settings().await;
        let history = self.load_local_history().await;
        push_settings(self.remote.as_ref(), token, record_id, &settings).await?;
        push_history(self.remote.as_ref(), token, record_id, &history).await
    }

    /// Token and remote record id, present only once initialized.
    fn ready_context(&self) -> Option<(String, String)> {
        let token = self.credential.get()?;
        let status = self.status();
        if !status.is_initialized {
            debug!("Sync requested before initialization");
            return None;
        }
        let record_id = status.remote_id?;
        Some((token, record_id))
    }

    async fn load_local_settings(&self) -> HostingSettings {
        match self.local.load_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!("Failed to load local settings ({}); using defaults", err);
                HostingSettings::default()
            }
        }
    }

    async fn load_local_history(&self) -> Vec<UploadRecord> {
        match self.local.load_history().await {
            Ok(history) => history,
            Err(err) => {
                warn!("Failed to load local history ({}); using an empty log", err);
                Vec::new()
            }
        }
    }

    fn update_status(&self, apply: impl FnOnce(&mut SyncStatus)) {
        let mut status = self.status.write().expect("status lock poisoned");
        apply(&mut status);
    }

    fn record_success(&self) {
        self.update_status(|status| {
            status.is_syncing = false;
            status.last_synced = Some(Utc::now().to_rfc3339());
            status.error = None;
        });
    }

    fn record_failure(&self, err: &GistSyncError) {
        warn!("Sync operation failed: {}", err);
        let message = err.user_message();
        self.update_status(|status| {
            status.is_syncing = false;
            status.error = Some(message);
        });
    }
}
