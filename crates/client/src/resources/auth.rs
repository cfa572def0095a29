//! Auth operations.
//!
//! The only resource client with session side effects: `login` stores the
//! granted credential and profile, `logout` clears them, `me` feeds a
//! profile refetch back into the session.

use std::sync::Arc;

use tracing::warn;

use super::models::{LoginGrant, RegisterRequest};
use crate::error::Result;
use crate::gateway::{ApiGateway, ApiRequest};
use crate::session::User;

pub struct AuthClient {
    gateway: Arc<ApiGateway>,
}

impl AuthClient {
    pub(crate) fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Authenticate with the backend and establish the local session.
    ///
    /// The endpoint takes a form-encoded username/password pair; the refresh
    /// credential comes back as a server-set cookie the client never reads.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = ApiRequest::post("/auth/login")
            .form(vec![
                ("username".to_string(), email.to_string()),
                ("password".to_string(), password.to_string()),
            ])
            .no_renewal();

        let grant: LoginGrant = self.gateway.send(request).await?;
        self.gateway
            .session()
            .login(grant.user.clone(), grant.grant.access_token)
            .await?;
        Ok(grant.user)
    }

    /// Register a new user and organization. Does not log in.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<User> {
        self.gateway
            .send(ApiRequest::post("/auth/register").json(payload)?.no_renewal())
            .await
    }

    /// End the session on both sides. The local session is cleared even if
    /// the server round-trip fails.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self
            .gateway
            .send_unit(ApiRequest::post("/auth/logout").no_renewal())
            .await
        {
            warn!(error = %e, "Server-side logout failed; clearing local session anyway");
        }
        self.gateway.session().logout().await?;
        Ok(())
    }

    /// Refetch the authenticated profile and update the session view.
    pub async fn me(&self) -> Result<User> {
        let user: User = self.gateway.send(ApiRequest::get("/auth/me")).await?;
        self.gateway.session().set_user(Some(user.clone())).await?;
        Ok(user)
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        self.gateway
            .send_unit(
                ApiRequest::post("/auth/verify-email")
                    .json(&serde_json::json!({ "token": token }))?
                    .no_renewal(),
            )
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.gateway
            .send_unit(
                ApiRequest::post("/auth/forgot-password")
                    .json(&serde_json::json!({ "email": email }))?
                    .no_renewal(),
            )
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        self.gateway
            .send_unit(
                ApiRequest::post("/auth/reset-password")
                    .json(&serde_json::json!({
                        "token": token,
                        "new_password": new_password,
                    }))?
                    .no_renewal(),
            )
            .await
    }
}
