//! Messaging-account operations.

use std::sync::Arc;

use uuid::Uuid;

use super::models::{Account, AccountCreate, AccountState, AccountUpdate};
use crate::error::Result;
use crate::gateway::{ApiGateway, ApiRequest};

pub struct AccountsClient {
    gateway: Arc<ApiGateway>,
}

impl AccountsClient {
    pub(crate) fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        self.gateway.send(ApiRequest::get("/accounts")).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Account> {
        self.gateway.send(ApiRequest::get(format!("/accounts/{id}"))).await
    }

    pub async fn create(&self, payload: &AccountCreate) -> Result<Account> {
        self.gateway
            .send(ApiRequest::post("/accounts").json(payload)?)
            .await
    }

    pub async fn update(&self, id: Uuid, payload: &AccountUpdate) -> Result<Account> {
        self.gateway
            .send(ApiRequest::patch(format!("/accounts/{id}")).json(payload)?)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.gateway
            .send_unit(ApiRequest::delete(format!("/accounts/{id}")))
            .await
    }

    /// Bring the account online with the platform.
    pub async fn connect(&self, id: Uuid) -> Result<AccountState> {
        self.gateway
            .send(ApiRequest::post(format!("/accounts/{id}/connect")))
            .await
    }

    pub async fn disconnect(&self, id: Uuid) -> Result<()> {
        self.gateway
            .send_unit(ApiRequest::post(format!("/accounts/{id}/disconnect")))
            .await
    }

    pub async fn status(&self, id: Uuid) -> Result<AccountState> {
        self.gateway
            .send(ApiRequest::get(format!("/accounts/{id}/status")))
            .await
    }
}
