//! Session and API-gateway client for the tg-console operations backend.
//!
//! The hard core is the gateway: every domain operation flows through one
//! request pipeline that attaches the current access credential, classifies
//! the response, and recovers from credential expiry with a single-flight
//! renewal exchange before replaying the failed request exactly once. The
//! session layer keeps one authoritative, persisted view of "who is logged
//! in"; resource clients are thin typed wrappers.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use console_client::ConsoleClient;
//! use console_client::session::FileStorage;
//!
//! # async fn doc() -> console_client::Result<()> {
//! let client = ConsoleClient::new(
//!     "https://console.example.com/api",
//!     Arc::new(FileStorage::new("/var/lib/tgc/session.json")),
//! )?;
//! client.restore().await?;
//!
//! if client.session().is_authenticated() {
//!     let accounts = client.accounts().list().await?;
//!     println!("{} accounts", accounts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gateway;
pub mod resources;
pub mod session;

use std::sync::Arc;

pub use error::{ApiError, Result};

use gateway::{ApiGateway, HttpTransport, Transport};
use resources::{AccountsClient, AuthClient, BillingClient, ProxiesClient, TasksClient};
use session::{SessionContext, SessionStorage};

/// Everything an application needs, wired together: one session, one
/// gateway, resource clients on demand.
pub struct ConsoleClient {
    gateway: Arc<ApiGateway>,
}

impl ConsoleClient {
    /// Build a client against `base_url` with the given session storage.
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(base_url)?);
        Ok(Self::with_transport(transport, SessionContext::new(storage)))
    }

    /// Build a client over a custom transport (tests, instrumentation).
    pub fn with_transport(transport: Arc<dyn Transport>, session: Arc<SessionContext>) -> Self {
        Self {
            gateway: ApiGateway::new(transport, session),
        }
    }

    /// Restore a persisted session before anything auth-gated runs.
    pub async fn restore(&self) -> Result<()> {
        self.gateway.session().restore().await?;
        Ok(())
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.gateway.session()
    }

    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(Arc::clone(&self.gateway))
    }

    pub fn accounts(&self) -> AccountsClient {
        AccountsClient::new(Arc::clone(&self.gateway))
    }

    pub fn proxies(&self) -> ProxiesClient {
        ProxiesClient::new(Arc::clone(&self.gateway))
    }

    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(Arc::clone(&self.gateway))
    }

    pub fn billing(&self) -> BillingClient {
        BillingClient::new(Arc::clone(&self.gateway))
    }
}
