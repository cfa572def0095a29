//! Billing operations.

use std::sync::Arc;

use super::models::{Invoice, Plan, PortalSession, SubscribeRequest, Subscription};
use crate::error::Result;
use crate::gateway::{ApiGateway, ApiRequest};

pub struct BillingClient {
    gateway: Arc<ApiGateway>,
}

impl BillingClient {
    pub(crate) fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn plans(&self) -> Result<Vec<Plan>> {
        self.gateway.send(ApiRequest::get("/billing/plans")).await
    }

    pub async fn subscription(&self) -> Result<Subscription> {
        self.gateway
            .send(ApiRequest::get("/billing/subscription"))
            .await
    }

    pub async fn invoices(&self) -> Result<Vec<Invoice>> {
        self.gateway.send(ApiRequest::get("/billing/invoices")).await
    }

    /// Start or change a subscription. The response shape is owned by the
    /// payment provider integration, so it stays untyped.
    pub async fn subscribe(&self, payload: &SubscribeRequest) -> Result<serde_json::Value> {
        self.gateway
            .send(ApiRequest::post("/billing/subscribe").json(payload)?)
            .await
    }

    /// Open a hosted billing-portal session.
    pub async fn portal(&self) -> Result<PortalSession> {
        self.gateway.send(ApiRequest::post("/billing/portal")).await
    }
}
