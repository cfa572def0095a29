//! Logical request description.
//!
//! Resource clients build an [`ApiRequest`] and hand it to the gateway; the
//! gateway owns credential attachment and replay, so the same value can be
//! sent again unchanged after a renewal.

use reqwest::Method;
use serde::Serialize;

use crate::error::{ApiError, Result};

/// Request payload.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// URL-encoded form (the login endpoint takes `username`/`password` this way).
    Form(Vec<(String, String)>),
}

/// A domain operation expressed as an HTTP request against the resource API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Whether a 401 may be absorbed by a renewal + replay. Credential
    /// endpoints (login, refresh, password reset) opt out: their 401s are
    /// definitive answers, not expiry.
    pub renew_on_auth_failure: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            renew_on_auth_failure: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|e| ApiError::InvalidRequest(format!("Unencodable request body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Surface a 401 directly instead of entering the renewal flow.
    pub fn no_renewal(mut self) -> Self {
        self.renew_on_auth_failure = false;
        self
    }
}

/// Replay marker. A request is replayed at most once per authentication
/// failure; a 401 on a [`Attempt::Replay`] is surfaced unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    Initial,
    Replay,
}
