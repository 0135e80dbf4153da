//! In-memory session credential holder.

use std::sync::RwLock;

/// Holds the GitHub access token for the lifetime of the session.
///
/// The token never reaches the persistence layer: persisted and pushed
/// settings copies are stripped before they leave the engine, and this
/// holder is dropped with the session.
#[derive(Debug, Default)]
pub struct SessionCredential {
    token: RwLock<Option<String>>,
}

impl SessionCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session token. An empty value clears the holder.
    pub fn set(&self, token: &str) {
        let mut slot = self.token.write().expect("credential lock poisoned");
        if token.trim().is_empty() {
            *slot = None;
        } else {
            *slot = Some(token.to_string());
        }
    }

    /// The current token, if one is held.
    pub fn get(&self) -> Option<String> {
        self.token.read().expect("credential lock poisoned").clone()
    }

    /// Drop the held token.
    pub fn clear(&self) {
        *self.token.write().expect("credential lock poisoned") = None;
    }
}
