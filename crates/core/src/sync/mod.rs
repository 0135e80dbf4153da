//! Sync status and failure taxonomy shared by the engine and its callers.

mod failure_model;
mod status_model;

pub use failure_model::*;
pub use status_model::*;
