//! Session state transitions.
//!
//! `SessionContext` is the single authoritative view of "who is logged in".
//! It is an explicitly constructed, process-scoped object handed to the
//! gateway and the resource clients; all mutation goes through the operations
//! below and every reader observes a change immediately.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use super::credentials::CredentialStore;
use super::storage::{SessionStorage, StorageError};
use super::types::{AuthState, SessionSnapshot, User};

/// Session record shared between `SessionContext` and `CredentialStore`.
///
/// Both views mutate the same snapshot and flush it as one durable record.
/// The lock is only held for in-memory reads/writes, never across an await.
pub(crate) struct Shared {
    pub(crate) snapshot: RwLock<SessionSnapshot>,
    storage: Arc<dyn SessionStorage>,
}

impl Shared {
    pub(crate) async fn flush(&self) -> Result<(), StorageError> {
        let snapshot = self.snapshot.read().clone();
        if snapshot.is_empty() {
            self.storage.clear().await
        } else {
            self.storage.save(&snapshot).await
        }
    }
}

/// Process-scoped session state.
pub struct SessionContext {
    shared: Arc<Shared>,
    credentials: CredentialStore,
    auth_tx: watch::Sender<AuthState>,
}

impl SessionContext {
    /// Create an empty (logged-out) session over the given storage.
    /// Call [`restore`](Self::restore) before serving anything gated on
    /// authentication.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Arc<Self> {
        let shared = Arc::new(Shared {
            snapshot: RwLock::new(SessionSnapshot::default()),
            storage,
        });
        let (auth_tx, _) = watch::channel(AuthState::Anonymous);
        Arc::new(Self {
            credentials: CredentialStore {
                shared: Arc::clone(&shared),
            },
            shared,
            auth_tx,
        })
    }

    /// Restore a previously persisted session on cold start.
    pub async fn restore(&self) -> Result<(), StorageError> {
        if let Some(snapshot) = self.shared.storage.load().await? {
            debug!(
                has_token = snapshot.access_token.is_some(),
                has_user = snapshot.user.is_some(),
                "Restored persisted session"
            );
            *self.shared.snapshot.write() = snapshot;
            self.broadcast();
        }
        Ok(())
    }

    /// Establish a session: sets the user profile and the access credential
    /// as one transition, persists, and notifies subscribers.
    pub async fn login(&self, user: User, token: impl Into<String>) -> Result<(), StorageError> {
        {
            let mut snapshot = self.shared.snapshot.write();
            snapshot.user = Some(user);
            snapshot.access_token = Some(token.into());
        }
        self.shared.flush().await?;
        self.broadcast();
        info!("Session established");
        Ok(())
    }

    /// Destroy the session and the stored credential. Idempotent.
    pub async fn logout(&self) -> Result<(), StorageError> {
        *self.shared.snapshot.write() = SessionSnapshot::default();
        self.shared.flush().await?;
        self.broadcast();
        info!("Session cleared");
        Ok(())
    }

    /// Update the user profile without touching the credential (after a
    /// profile refetch). `None` forces the unauthenticated state.
    pub async fn set_user(&self, user: Option<User>) -> Result<(), StorageError> {
        self.shared.snapshot.write().user = user;
        self.shared.flush().await?;
        self.broadcast();
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.shared.snapshot.read().user.clone()
    }

    /// `true` exactly when a session is live.
    pub fn is_authenticated(&self) -> bool {
        self.shared.snapshot.read().user.is_some()
    }

    pub fn auth_state(&self) -> AuthState {
        *self.auth_tx.borrow()
    }

    /// Observe login/logout transitions, including forced teardown after an
    /// irrecoverable renewal failure.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn broadcast(&self) {
        let state = if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };
        self.auth_tx.send_replace(state);
    }
}
