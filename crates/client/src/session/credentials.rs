//! Access-credential store.
//!
//! A narrow view over the shared session record: holds the current bearer
//! token in memory and flushes it through the persistence layer. Pure
//! storage primitive - no network or session-state side effects.

use std::sync::Arc;

use super::state::Shared;
use super::storage::StorageError;

/// Durable holder for the access credential.
///
/// If a credential is present it is always the most recently issued one
/// known to this client; a successful renewal overwrites it before any
/// replay is sent.
#[derive(Clone)]
pub struct CredentialStore {
    pub(crate) shared: Arc<Shared>,
}

impl CredentialStore {
    /// Current access credential, if any.
    pub fn get(&self) -> Option<String> {
        self.shared.snapshot.read().access_token.clone()
    }

    /// Persist a new access credential. Subsequent `get` calls return it
    /// until overwritten or cleared.
    pub async fn set(&self, token: impl Into<String>) -> Result<(), StorageError> {
        self.shared.snapshot.write().access_token = Some(token.into());
        self.shared.flush().await
    }

    /// Remove any stored credential. Idempotent.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.shared.snapshot.write().access_token = None;
        self.shared.flush().await
    }
}
