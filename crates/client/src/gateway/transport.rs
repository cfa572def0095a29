//! HTTP transport seam.
//!
//! The pipeline talks to the network through [`Transport`] so tests can
//! substitute a scripted implementation; [`HttpTransport`] is the production
//! reqwest-backed one. The refresh credential travels in the client cookie
//! jar and is never inspected here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use tracing::debug;

use super::request::{ApiRequest, RequestBody};
use crate::error::{ApiError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_UA: &str = concat!("tg-console/", env!("CARGO_PKG_VERSION"));

/// Raw response handed back to the pipeline for classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Sends a logical request, optionally with a bearer credential attached.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport against `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let provider = Arc::new(ring::default_provider());
        let tls_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ApiError::InvalidRequest(format!("TLS protocol config: {e}")))?
            .with_platform_verifier()
            .map_err(|e| ApiError::InvalidRequest(format!("TLS verifier: {e}")))?
            .with_no_client_auth();

        let client = Client::builder()
            .use_preconfigured_tls(tls_config)
            // The refresh credential is a server-set cookie; the jar carries
            // it to /auth/refresh without client code ever touching it.
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(DEFAULT_UA)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => builder = builder.json(value),
            RequestBody::Form(fields) => builder = builder.form(fields),
        }

        // Attach the credential immediately before sending so a replay picks
        // up the token minted by the renewal, never a stale one.
        if let Some(token) = bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidRequest(format!("Malformed bearer token: {e}")))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        debug!(method = %request.method, path = %request.path, authenticated = bearer.is_some(), "Dispatching request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Network(e)
            }
        })?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }
}
