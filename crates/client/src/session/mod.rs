//! Session state, credential store, and persistence.
//!
//! # Architecture
//!
//! - [`SessionStorage`]: narrow persistence adapter (one durable record)
//! - [`CredentialStore`]: durable holder for the access credential
//! - [`SessionContext`]: authoritative "who is logged in" state machine
//! - [`AuthState`]: login/logout transitions broadcast to subscribers

mod credentials;
mod state;
mod storage;
mod types;

pub use credentials::CredentialStore;
pub use state::SessionContext;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use types::{AuthState, SessionSnapshot, User, UserRole};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{User, UserRole};

    pub(crate) fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            email: "ops@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Ops".to_string(),
            role: UserRole::Admin,
            is_active: true,
            is_verified: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }
}
