//! GitHub Gist synchronization engine for PicVault.
//!
//! Keeps one private gist per account as the canonical copy of the hosting
//! settings and upload history. The [`SyncEngine`] locates or creates that
//! gist, reconciles it with local state, serializes concurrent sync
//! attempts, and classifies remote failures into remediation text for the
//! caller.

mod client;
mod credentials;
mod engine;
mod error;
mod locator;
mod ports;
mod reconcile;
mod repository;
mod types;

#[cfg(test)]
mod testing;

pub use client::{GistClient, GITHUB_API_URL};
pub use credentials::SessionCredential;
pub use engine::SyncEngine;
pub use error::{GistSyncError, Result};
pub use locator::{
    create_seeded_record, locate_record, CONFIG_FILENAME, GIST_DESCRIPTION, HISTORY_FILENAME,
};
pub use ports::RemoteStore;
pub use reconcile::{pull_history, pull_settings, push_history, push_settings};
pub use repository::check_repository_access;
pub use types::*;
