//! Request pipeline.
//!
//! Uniform dispatch of domain operations: attaches the current access
//! credential, classifies the response, and absorbs recoverable
//! authentication failures through the renewal coordinator. Callers observe
//! either the original success, the replay's outcome, or a definitive error.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::renewal::RenewalCoordinator;
use super::request::{ApiRequest, Attempt};
use super::transport::{RawResponse, Transport};
use crate::error::{ApiError, Result};
use crate::session::SessionContext;

/// Gateway to the remote resource API.
///
/// One instance per application; resource clients share it via `Arc`.
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    session: Arc<SessionContext>,
    renewal: RenewalCoordinator,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionContext>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            session,
            renewal: RenewalCoordinator::new(),
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Dispatch a request and decode the JSON response body.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(&request).await?;
        serde_json::from_slice(&response.body).map_err(ApiError::Decode)
    }

    /// Dispatch a request, discarding any response body (204-style endpoints).
    pub async fn send_unit(&self, request: ApiRequest) -> Result<()> {
        self.execute(&request).await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        match self.attempt(request, Attempt::Initial).await {
            // Only a held credential can have expired; a 401 on an
            // anonymous request is a definitive answer.
            Err(e)
                if e.is_auth_failure()
                    && request.renew_on_auth_failure
                    && self.session.credentials().get().is_some() =>
            {
                debug!("Authentication failure - renewing credential before replay");
                self.renewal
                    .renew(Arc::clone(&self.transport), Arc::clone(&self.session))
                    .await?;
                self.attempt(request, Attempt::Replay).await
            }
            other => other,
        }
    }

    async fn attempt(&self, request: &ApiRequest, attempt: Attempt) -> Result<RawResponse> {
        // Read the credential immediately before sending; a replay therefore
        // carries the token the renewal just minted.
        let bearer = self.session.credentials().get();
        let response = self.transport.send(request, bearer.as_deref()).await?;
        classify(response, attempt, &request.path)
    }
}

fn classify(response: RawResponse, attempt: Attempt, path: &str) -> Result<RawResponse> {
    let status = response.status;
    if status.is_success() {
        return Ok(response);
    }

    let message = extract_detail(&response.body, status);

    if status == StatusCode::UNAUTHORIZED {
        if attempt == Attempt::Replay {
            warn!(path, "Replayed request rejected again - surfacing to caller");
        }
        return Err(ApiError::Unauthorized(message));
    }

    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull the human-readable message out of the backend's `{"detail": ...}`
/// envelope, falling back to the status reason.
fn extract_detail(body: &[u8], status: StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct Envelope {
        detail: serde_json::Value,
    }

    if let Ok(envelope) = serde_json::from_slice::<Envelope>(body) {
        return match envelope.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::super::testing::{FakeTransport, RefreshScript};
    use super::*;
    use crate::session::MemoryStorage;

    async fn gateway_with_token(
        transport: Arc<FakeTransport>,
        token: &str,
    ) -> (Arc<ApiGateway>, Arc<SessionContext>) {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        session.credentials().set(token).await.unwrap();
        let gateway = ApiGateway::new(transport, Arc::clone(&session));
        (gateway, session)
    }

    #[tokio::test]
    async fn valid_credential_passes_through() {
        let transport = Arc::new(FakeTransport::new("t0"));
        let (gateway, _session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let body: serde_json::Value = gateway.send(ApiRequest::get("/accounts")).await.unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(transport.refresh_calls(), 0);
        assert_eq!(
            transport.recorded_bearers("/accounts"),
            vec![Some("t0".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_credential_sends_unauthenticated() {
        let transport = Arc::new(FakeTransport::public("/billing/plans"));
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        let gateway = ApiGateway::new(Arc::clone(&transport) as Arc<dyn Transport>, session);

        let body: serde_json::Value = gateway
            .send(ApiRequest::get("/billing/plans"))
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(transport.recorded_bearers("/billing/plans"), vec![None]);
    }

    #[tokio::test]
    async fn anonymous_401_is_surfaced_without_renewal() {
        // No credential is held, so a 401 cannot be an expiry.
        let transport = Arc::new(FakeTransport::new("t0"));
        let session = SessionContext::new(Arc::new(MemoryStorage::new()));
        let gateway = ApiGateway::new(Arc::clone(&transport) as Arc<dyn Transport>, session);

        let result: Result<serde_json::Value> = gateway.send(ApiRequest::get("/accounts")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert_eq!(transport.refresh_calls(), 0);
        assert_eq!(transport.recorded_bearers("/accounts"), vec![None]);
    }

    #[tokio::test]
    async fn expired_credential_is_renewed_and_replayed_once() {
        // Client holds expired t0; server only accepts t1; refresh mints t1.
        let transport = Arc::new(FakeTransport::new("t1"));
        transport.script_refresh(RefreshScript::Grant("t1".to_string()));
        let (gateway, session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let body: serde_json::Value = gateway.send(ApiRequest::get("/accounts")).await.unwrap();

        assert_eq!(body["ok"], true);
        assert_eq!(transport.refresh_calls(), 1);
        assert_eq!(session.credentials().get().as_deref(), Some("t1"));
        // original attempt with t0, single replay with the renewed t1
        assert_eq!(
            transport.recorded_bearers("/accounts"),
            vec![Some("t0".to_string()), Some("t1".to_string())]
        );
    }

    #[tokio::test]
    async fn replay_auth_failure_is_surfaced_not_retried() {
        // Refresh succeeds but mints a token the server still rejects; the
        // replayed request must fail terminally instead of looping.
        let transport = Arc::new(FakeTransport::new("valid"));
        transport.script_refresh(RefreshScript::Grant("still-bad".to_string()));
        let (gateway, _session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let result: Result<serde_json::Value> = gateway.send(ApiRequest::get("/accounts")).await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert_eq!(transport.refresh_calls(), 1);
        assert_eq!(transport.recorded_bearers("/accounts").len(), 2);
    }

    #[tokio::test]
    async fn renewal_failure_surfaces_session_expired() {
        let transport = Arc::new(FakeTransport::new("t1"));
        transport.script_refresh(RefreshScript::Reject);
        let (gateway, session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let result: Result<serde_json::Value> = gateway.send(ApiRequest::get("/accounts")).await;

        assert!(matches!(result, Err(ApiError::SessionExpired)));
        assert!(session.credentials().get().is_none());
        assert!(!session.is_authenticated());
        // no replay was issued
        assert_eq!(transport.recorded_bearers("/accounts").len(), 1);
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_exchange_and_all_replay() {
        let transport = Arc::new(FakeTransport::new("t1"));
        transport.script_refresh(RefreshScript::Grant("t1".to_string()));
        transport.set_refresh_delay(std::time::Duration::from_millis(20));
        let (gateway, _session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let mut handles = Vec::new();
        for i in 0..6 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                gateway
                    .send::<serde_json::Value>(ApiRequest::get(format!("/accounts/{i}")))
                    .await
            }));
        }

        for handle in handles {
            let body = handle.await.unwrap().unwrap();
            assert_eq!(body["ok"], true);
        }

        assert_eq!(transport.refresh_calls(), 1);
        // every request ends up replayed with the renewed token
        for i in 0..6 {
            let bearers = transport.recorded_bearers(&format!("/accounts/{i}"));
            assert_eq!(bearers.last().unwrap().as_deref(), Some("t1"));
        }
    }

    #[tokio::test]
    async fn credential_endpoints_surface_401_without_renewal() {
        let transport = Arc::new(FakeTransport::new("t1"));
        transport.script_refresh(RefreshScript::Grant("t1".to_string()));
        let (gateway, _session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let result: Result<serde_json::Value> = gateway
            .send(ApiRequest::post("/auth/login").no_renewal())
            .await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert_eq!(transport.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn domain_failures_pass_through_untouched() {
        let transport = Arc::new(FakeTransport::new("t0"));
        transport.script_error("/proxies/missing", 404, "Proxy not found");
        let (gateway, _session) = gateway_with_token(Arc::clone(&transport), "t0").await;

        let result: Result<serde_json::Value> =
            gateway.send(ApiRequest::get("/proxies/missing")).await;

        match result {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Proxy not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // domain failures are never retried
        assert_eq!(transport.recorded_bearers("/proxies/missing").len(), 1);
        assert_eq!(transport.refresh_calls(), 0);
    }

    #[rstest]
    #[case(br#"{"detail": "Validation error"}"#, "Validation error")]
    #[case(br#"{"detail": [{"loc": ["body"]}]}"#, r#"[{"loc":["body"]}]"#)]
    #[case(b"not json", "Conflict")]
    fn detail_extraction(#[case] body: &[u8], #[case] expected: &str) {
        assert_eq!(extract_detail(body, StatusCode::CONFLICT), expected);
    }
}
