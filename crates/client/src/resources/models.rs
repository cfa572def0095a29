//! Typed payloads for the resource API.
//!
//! These mirror the backend's response schemas; the gateway treats them as
//! opaque JSON and only the resource clients give them shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::User;

// ---------------------------------------------------------------------------
// Auth

/// Token material returned by `/auth/login` and `/auth/refresh`.
///
/// The refresh credential itself travels as a server-set cookie; a
/// `refresh_token` field present in the body is intentionally not modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access-token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `/auth/login` response: token material plus the authenticated profile.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    #[serde(flatten)]
    pub grant: TokenGrant,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
}

// ---------------------------------------------------------------------------
// Accounts

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Banned,
    AuthRequired,
    ConnectionError,
    Pending,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub phone_number: String,
    pub api_id: i64,
    pub api_hash: String,
    #[serde(default)]
    pub proxy_id: Option<Uuid>,
    pub daily_limit: u32,
    pub status: AccountStatus,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub account_type: String,
    pub actions_today: u32,
    #[serde(default)]
    pub last_action_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of `connect` and `status` lifecycle actions.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountState {
    pub status: AccountStatus,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountCreate {
    pub phone_number: String,
    pub api_id: i64,
    pub api_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<Uuid>,
    pub daily_limit: u32,
    /// Base64-encoded session file content.
    pub session_file: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

// ---------------------------------------------------------------------------
// Proxies

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyStatus {
    Active,
    Inactive,
    Testing,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyProtocol {
    Http,
    Https,
    Socks5,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Proxy {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub protocol: ProxyProtocol,
    pub status: ProxyStatus,
    /// Milliseconds, from the most recent test.
    #[serde(default)]
    pub latency: Option<u32>,
    #[serde(default)]
    pub last_tested: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxyCreate {
    pub ip: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub protocol: ProxyProtocol,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProxyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProxyProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProxyStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyTestResult {
    pub success: bool,
    #[serde(default)]
    pub latency: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Tasks

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ProfilePhoto,
    BioUpdate,
    UsernameUpdate,
    MediaSend,
    MessageSend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub payload: serde_json::Value,
    pub status: TaskStatus,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub retry_count: u32,
    /// 0-100.
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskCreate {
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkTaskCreate {
    pub account_ids: Vec<Uuid>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskProgress {
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub progress: u8,
    #[serde(default)]
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Billing

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Starter,
    Pro,
    Agency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
    Trialing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    /// Decimal amount as the backend serializes it.
    pub price: String,
    pub interval: String,
    pub max_accounts: u32,
    pub max_users: u32,
    pub max_automation_per_day: u32,
    #[serde(default)]
    pub features: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub trial_end: Option<DateTime<Utc>>,
    pub max_accounts: u32,
    pub max_users: u32,
    pub max_automation_per_day: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub plan_id: Uuid,
    #[serde(default)]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    pub plan_id: Uuid,
    pub payment_method_id: String,
}

/// Hosted billing-portal session.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSession {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::AuthRequired).unwrap(),
            r#""auth_required""#
        );
        assert_eq!(
            serde_json::to_string(&ProxyProtocol::Socks5).unwrap(),
            r#""socks5""#
        );
        assert_eq!(
            serde_json::to_string(&TaskType::ProfilePhoto).unwrap(),
            r#""profile_photo""#
        );
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::PastDue).unwrap(),
            r#""past_due""#
        );
    }

    #[test]
    fn task_deserializes_from_backend_shape() {
        let json = r#"{
            "id": "5f6bbec5-57ff-44f2-a1b4-ddca42fbd853",
            "organization_id": "b67a2e31-2b88-4bc7-b3f4-3e1da30bd88a",
            "user_id": "9b6a5579-9a3f-4e42-9c5a-3a1a1f2b6f53",
            "account_id": "28f0fbbe-7bb9-41a0-a45b-e95e5b66e2b1",
            "type": "bio_update",
            "payload": {"bio": "new bio"},
            "status": "pending",
            "scheduled_for": null,
            "started_at": null,
            "completed_at": null,
            "error_message": null,
            "retry_count": 0,
            "progress": 0,
            "created_at": "2026-01-05T12:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_type, TaskType::BioUpdate);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.payload["bio"], "new bio");
    }

    #[test]
    fn login_grant_flattens_token_fields() {
        let json = r#"{
            "access_token": "t0",
            "token_type": "bearer",
            "expires_in": 1800,
            "user": {
                "id": "5f6bbec5-57ff-44f2-a1b4-ddca42fbd853",
                "organization_id": "b67a2e31-2b88-4bc7-b3f4-3e1da30bd88a",
                "email": "ops@example.com",
                "first_name": "Ada",
                "last_name": "Ops",
                "role": "owner",
                "is_active": true,
                "is_verified": true,
                "last_login": null,
                "created_at": "2026-01-05T12:00:00Z"
            }
        }"#;

        let grant: LoginGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.grant.access_token, "t0");
        assert_eq!(grant.user.email, "ops@example.com");
    }
}
