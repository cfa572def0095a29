//! Request pipeline, renewal coordination, and transport.

mod pipeline;
mod renewal;
mod request;
mod transport;

pub use pipeline::ApiGateway;
pub use request::{ApiRequest, RequestBody};
pub use transport::{HttpTransport, RawResponse, Transport};

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for pipeline and renewal tests.

    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use reqwest::StatusCode;

    use super::request::ApiRequest;
    use super::transport::{RawResponse, Transport};
    use crate::error::Result;

    const REFRESH_PATH: &str = "/auth/refresh";

    /// What the fake server does when the refresh credential is presented.
    #[derive(Debug, Clone)]
    pub(crate) enum RefreshScript {
        /// Exchange succeeds and mints this access token.
        Grant(String),
        /// Refresh credential invalid/expired: 401.
        Reject,
    }

    pub(crate) struct RecordedRequest {
        pub(crate) path: String,
        pub(crate) query: Vec<(String, String)>,
        pub(crate) bearer: Option<String>,
    }

    struct FakeState {
        /// The only bearer the server accepts on authenticated routes.
        valid_token: Option<String>,
        public_paths: Vec<String>,
        refresh: RefreshScript,
        refresh_calls: u32,
        refresh_delay: Option<Duration>,
        /// Per-path canned responses (status + JSON body).
        scripted: HashMap<String, (u16, serde_json::Value)>,
        /// Domain requests in arrival order.
        requests: Vec<RecordedRequest>,
    }

    pub(crate) struct FakeTransport {
        state: Mutex<FakeState>,
    }

    impl FakeTransport {
        /// Server that accepts exactly `valid_token` on authenticated routes.
        pub(crate) fn new(valid_token: &str) -> Self {
            Self {
                state: Mutex::new(FakeState {
                    valid_token: Some(valid_token.to_string()),
                    public_paths: Vec::new(),
                    refresh: RefreshScript::Reject,
                    refresh_calls: 0,
                    refresh_delay: None,
                    scripted: HashMap::new(),
                    requests: Vec::new(),
                }),
            }
        }

        /// Server where `path` requires no authentication.
        pub(crate) fn public(path: &str) -> Self {
            let transport = Self::new("unused");
            transport.state.lock().public_paths.push(path.to_string());
            transport
        }

        pub(crate) fn script_refresh(&self, script: RefreshScript) {
            self.state.lock().refresh = script;
        }

        pub(crate) fn set_refresh_delay(&self, delay: Duration) {
            self.state.lock().refresh_delay = Some(delay);
        }

        /// Canned response for a path, any bearer.
        pub(crate) fn script_response(&self, path: &str, status: u16, body: serde_json::Value) {
            self.state
                .lock()
                .scripted
                .insert(path.to_string(), (status, body));
        }

        pub(crate) fn script_error(&self, path: &str, status: u16, detail: &str) {
            self.script_response(path, status, serde_json::json!({ "detail": detail }));
        }

        pub(crate) fn refresh_calls(&self) -> u32 {
            self.state.lock().refresh_calls
        }

        pub(crate) fn recorded_bearers(&self, path: &str) -> Vec<Option<String>> {
            self.state
                .lock()
                .requests
                .iter()
                .filter(|r| r.path == path)
                .map(|r| r.bearer.clone())
                .collect()
        }

        pub(crate) fn recorded_queries(&self, path: &str) -> Vec<Vec<(String, String)>> {
            self.state
                .lock()
                .requests
                .iter()
                .filter(|r| r.path == path)
                .map(|r| r.query.clone())
                .collect()
        }

        fn json(status: u16, body: serde_json::Value) -> RawResponse {
            RawResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: Bytes::from(body.to_string()),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse> {
            if request.path == REFRESH_PATH {
                let (script, delay) = {
                    let mut state = self.state.lock();
                    state.refresh_calls += 1;
                    (state.refresh.clone(), state.refresh_delay)
                };
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                return Ok(match script {
                    RefreshScript::Grant(token) => Self::json(
                        200,
                        serde_json::json!({
                            "access_token": token,
                            "token_type": "bearer",
                            "expires_in": 1800,
                        }),
                    ),
                    RefreshScript::Reject => {
                        Self::json(401, serde_json::json!({"detail": "Invalid refresh token"}))
                    }
                });
            }

            let mut state = self.state.lock();
            state.requests.push(RecordedRequest {
                path: request.path.clone(),
                query: request.query.clone(),
                bearer: bearer.map(str::to_string),
            });

            if let Some((status, body)) = state.scripted.get(&request.path) {
                return Ok(Self::json(*status, body.clone()));
            }

            let authorized = state.public_paths.contains(&request.path)
                || (bearer.is_some() && bearer == state.valid_token.as_deref());

            Ok(if authorized {
                Self::json(200, serde_json::json!({"ok": true}))
            } else {
                Self::json(
                    401,
                    serde_json::json!({"detail": "Could not validate credentials"}),
                )
            })
        }
    }
}
