//! Rendering of API payloads for the terminal.

use console_client::resources::models::{
    Account, AccountState, Invoice, Plan, PortalSession, Proxy, ProxyTestResult, Subscription,
    Task, TaskProgress,
};
use console_client::session::User;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn emit<T: Serialize>(&self, value: &T, pretty: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Pretty => println!("{}", pretty()),
        }
        Ok(())
    }

    pub fn user(&self, user: &User) -> Result<()> {
        self.emit(user, || {
            format!(
                "{} <{}>\n  role: {:?}\n  organization: {}",
                user.display_name(),
                user.email,
                user.role,
                user.organization_id
            )
        })
    }

    pub fn message(&self, text: &str) -> Result<()> {
        self.emit(&serde_json::json!({ "message": text }), || text.to_string())
    }

    pub fn accounts(&self, accounts: &[Account]) -> Result<()> {
        let accounts_json: Vec<serde_json::Value> = accounts
            .iter()
            .map(|a| serde_json::json!({
                "id": a.id,
                "phone_number": a.phone_number,
                "status": a.status,
                "username": a.username,
                "actions_today": a.actions_today,
                "daily_limit": a.daily_limit,
            }))
            .collect();
        self.emit(&accounts_json, || {
            let mut lines = vec![format!("{} account(s)", accounts.len())];
            for a in accounts {
                lines.push(format!(
                    "  {}  {:<16} {:?}  {}/{} actions today",
                    a.id,
                    a.phone_number,
                    a.status,
                    a.actions_today,
                    a.daily_limit
                ));
            }
            lines.join("\n")
        })
    }

    pub fn account_state(&self, state: &AccountState) -> Result<()> {
        let json = serde_json::json!({
            "status": state.status,
            "username": state.username,
            "is_premium": state.is_premium,
            "last_active": state.last_active,
        });
        self.emit(&json, || {
            format!(
                "status: {:?}  username: {}  premium: {}",
                state.status,
                state.username.as_deref().unwrap_or("-"),
                state
                    .is_premium
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            )
        })
    }

    pub fn proxies(&self, proxies: &[Proxy]) -> Result<()> {
        let json: Vec<serde_json::Value> = proxies
            .iter()
            .map(|p| serde_json::json!({
                "id": p.id,
                "endpoint": format!("{:?}://{}:{}", p.protocol, p.ip, p.port),
                "status": p.status,
                "latency": p.latency,
            }))
            .collect();
        self.emit(&json, || {
            let mut lines = vec![format!("{} proxy(ies)", proxies.len())];
            for p in proxies {
                lines.push(format!(
                    "  {}  {:?}://{}:{}  {:?}  latency: {}",
                    p.id,
                    p.protocol,
                    p.ip,
                    p.port,
                    p.status,
                    p.latency
                        .map(|l| format!("{l}ms"))
                        .unwrap_or_else(|| "-".to_string())
                ));
            }
            lines.join("\n")
        })
    }

    pub fn proxy_test(&self, result: &ProxyTestResult) -> Result<()> {
        let json = serde_json::json!({
            "success": result.success,
            "latency": result.latency,
            "error": result.error,
        });
        self.emit(&json, || {
            if result.success {
                format!(
                    "OK ({})",
                    result
                        .latency
                        .map(|l| format!("{l}ms"))
                        .unwrap_or_else(|| "latency unknown".to_string())
                )
            } else {
                format!(
                    "FAILED: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }

    pub fn tasks(&self, tasks: &[Task]) -> Result<()> {
        let json: Vec<serde_json::Value> = tasks
            .iter()
            .map(|t| serde_json::json!({
                "id": t.id,
                "type": t.task_type,
                "status": t.status,
                "progress": t.progress,
                "account_id": t.account_id,
            }))
            .collect();
        self.emit(&json, || {
            let mut lines = vec![format!("{} task(s)", tasks.len())];
            for t in tasks {
                lines.push(format!(
                    "  {}  {:?}  {:?}  {}%  account {}",
                    t.id, t.task_type, t.status, t.progress, t.account_id
                ));
            }
            lines.join("\n")
        })
    }

    pub fn task_progress(&self, progress: &TaskProgress) -> Result<()> {
        let json = serde_json::json!({
            "task_id": progress.task_id,
            "status": progress.status,
            "progress": progress.progress,
            "error_message": progress.error_message,
        });
        self.emit(&json, || {
            let mut line = format!("{:?}  {}%", progress.status, progress.progress);
            if let Some(error) = &progress.error_message {
                line.push_str(&format!("  error: {error}"));
            }
            line
        })
    }

    pub fn plans(&self, plans: &[Plan]) -> Result<()> {
        let json: Vec<serde_json::Value> = plans
            .iter()
            .map(|p| serde_json::json!({
                "id": p.id,
                "name": p.name,
                "price": p.price,
                "interval": p.interval,
                "max_accounts": p.max_accounts,
            }))
            .collect();
        self.emit(&json, || {
            let mut lines = Vec::new();
            for p in plans {
                lines.push(format!(
                    "  {:<12} {}/{}  up to {} accounts, {} users, {} tasks/day",
                    p.name, p.price, p.interval, p.max_accounts, p.max_users,
                    p.max_automation_per_day
                ));
            }
            lines.join("\n")
        })
    }

    pub fn subscription(&self, sub: &Subscription) -> Result<()> {
        let json = serde_json::json!({
            "tier": sub.tier,
            "status": sub.status,
            "current_period_end": sub.current_period_end,
            "cancel_at_period_end": sub.cancel_at_period_end,
        });
        self.emit(&json, || {
            format!(
                "{:?} ({:?})  period ends: {}  cancel at period end: {}",
                sub.tier,
                sub.status,
                sub.current_period_end
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
                sub.cancel_at_period_end
            )
        })
    }

    pub fn invoices(&self, invoices: &[Invoice]) -> Result<()> {
        let json: Vec<serde_json::Value> = invoices
            .iter()
            .map(|i| serde_json::json!({
                "id": i.id,
                "amount": i.amount,
                "currency": i.currency,
                "status": i.status,
                "paid_at": i.paid_at,
            }))
            .collect();
        self.emit(&json, || {
            let mut lines = vec![format!("{} invoice(s)", invoices.len())];
            for i in invoices {
                lines.push(format!(
                    "  {}  {} {}  {}  {}",
                    i.id,
                    i.amount,
                    i.currency,
                    i.status,
                    i.paid_at
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_else(|| "unpaid".to_string())
                ));
            }
            lines.join("\n")
        })
    }

    pub fn portal(&self, portal: &PortalSession) -> Result<()> {
        self.emit(&serde_json::json!({ "url": portal.url }), || {
            format!("Billing portal: {}", portal.url)
        })
    }
}
