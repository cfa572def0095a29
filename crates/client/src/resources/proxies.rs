//! Proxy-endpoint operations.

use std::sync::Arc;

use uuid::Uuid;

use super::models::{Proxy, ProxyCreate, ProxyTestResult, ProxyUpdate};
use crate::error::Result;
use crate::gateway::{ApiGateway, ApiRequest};

pub struct ProxiesClient {
    gateway: Arc<ApiGateway>,
}

impl ProxiesClient {
    pub(crate) fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Proxy>> {
        self.gateway.send(ApiRequest::get("/proxies")).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Proxy> {
        self.gateway.send(ApiRequest::get(format!("/proxies/{id}"))).await
    }

    pub async fn create(&self, payload: &ProxyCreate) -> Result<Proxy> {
        self.gateway
            .send(ApiRequest::post("/proxies").json(payload)?)
            .await
    }

    pub async fn update(&self, id: Uuid, payload: &ProxyUpdate) -> Result<Proxy> {
        self.gateway
            .send(ApiRequest::patch(format!("/proxies/{id}")).json(payload)?)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.gateway
            .send_unit(ApiRequest::delete(format!("/proxies/{id}")))
            .await
    }

    /// Probe reachability and latency of the proxy.
    pub async fn test(&self, id: Uuid) -> Result<ProxyTestResult> {
        self.gateway
            .send(ApiRequest::post(format!("/proxies/{id}/test")))
            .await
    }
}
