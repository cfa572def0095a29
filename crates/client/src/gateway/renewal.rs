//! Credential renewal coordinator.
//!
//! Recovers from an expired access credential by exchanging the server-held
//! refresh credential for a fresh token, at most one exchange in flight at a
//! time. The exchange runs in its own task: once started it finishes even if
//! the caller that started it is cancelled. Concurrent callers failing at the
//! same expiry boundary await the same outcome instead of racing their own
//! exchanges; the refresh credential rotates server-side on every exchange,
//! so a duplicate would consume a token the jar never stored.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

use super::request::ApiRequest;
use super::transport::Transport;
use crate::error::{ApiError, Result};
use crate::resources::models::TokenGrant;
use crate::session::SessionContext;

/// Deadline for the renewal exchange itself. A timeout is treated the same
/// as a definitive rejection: the session is irrecoverable.
const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(15);

/// `None` while the exchange is running, then `Some(succeeded)`.
type Outcome = watch::Receiver<Option<bool>>;

pub(crate) struct RenewalCoordinator {
    /// Outcome channel of the in-flight exchange, if one is running. Cleared
    /// by the exchange task itself right before it publishes its outcome, so
    /// a later failure episode starts a fresh exchange.
    inflight: Arc<Mutex<Option<Outcome>>>,
    exchange_timeout: Duration,
}

impl RenewalCoordinator {
    pub(crate) fn new() -> Self {
        Self::with_timeout(DEFAULT_EXCHANGE_TIMEOUT)
    }

    pub(crate) fn with_timeout(exchange_timeout: Duration) -> Self {
        Self {
            inflight: Arc::new(Mutex::new(None)),
            exchange_timeout,
        }
    }

    /// Renew the access credential, single-flight.
    ///
    /// On success the new credential is already persisted when this returns;
    /// on failure the session has been torn down and every waiter sees
    /// [`ApiError::SessionExpired`].
    pub(crate) async fn renew(
        &self,
        transport: Arc<dyn Transport>,
        session: Arc<SessionContext>,
    ) -> Result<()> {
        let mut outcome = {
            let mut inflight = self.inflight.lock();
            match inflight.as_ref() {
                Some(rx) => rx.clone(),
                None => {
                    let (tx, rx) = watch::channel(None);
                    *inflight = Some(rx.clone());

                    let slot = Arc::clone(&self.inflight);
                    let deadline = self.exchange_timeout;
                    tokio::spawn(async move {
                        let result = exchange(deadline, transport.as_ref(), &session).await;
                        // Clear the slot before publishing: a caller arriving
                        // after this point is a new failure episode.
                        *slot.lock() = None;
                        tx.send_replace(Some(result.is_ok()));
                    });
                    rx
                }
            }
        };

        loop {
            if let Some(succeeded) = *outcome.borrow_and_update() {
                return if succeeded {
                    Ok(())
                } else {
                    Err(ApiError::SessionExpired)
                };
            }
            if outcome.changed().await.is_err() {
                // Exchange task died without publishing.
                return Err(ApiError::SessionExpired);
            }
        }
    }
}

async fn exchange(
    deadline: Duration,
    transport: &dyn Transport,
    session: &SessionContext,
) -> Result<()> {
    info!("Access credential rejected - starting renewal exchange");

    // No bearer attached: the exchange relies on the server-managed refresh
    // credential riding the cookie jar.
    let request = ApiRequest::post("/auth/refresh");
    let response = match tokio::time::timeout(deadline, transport.send(&request, None)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(error = %e, "Renewal exchange failed");
            return teardown(session).await;
        }
        Err(_) => {
            warn!(
                timeout_secs = deadline.as_secs(),
                "Renewal exchange timed out"
            );
            return teardown(session).await;
        }
    };

    if !response.status.is_success() {
        warn!(status = %response.status, "Renewal exchange rejected - re-login required");
        return teardown(session).await;
    }

    let grant: TokenGrant = match serde_json::from_slice(&response.body) {
        Ok(grant) => grant,
        Err(e) => {
            warn!(error = %e, "Renewal exchange returned an unreadable grant");
            return teardown(session).await;
        }
    };

    // The in-memory credential is updated even if the flush fails; the
    // durable copy catches up on the next successful write.
    if let Err(e) = session.credentials().set(grant.access_token).await {
        warn!(error = %e, "Failed to persist renewed credential (non-fatal)");
    }

    info!("Access credential renewed");
    Ok(())
}

/// Irrecoverable renewal failure: clear credential and session, driving
/// every subscriber to the unauthenticated entry point.
async fn teardown(session: &SessionContext) -> Result<()> {
    if let Err(e) = session.logout().await {
        warn!(error = %e, "Failed to clear persisted session (non-fatal)");
    }
    Err(ApiError::SessionExpired)
}
