//! Typed resource clients over the request pipeline.
//!
//! Parameter shaping only; credential attachment, renewal, and error
//! classification all live in the gateway.

mod accounts;
mod auth;
mod billing;
pub mod models;
mod proxies;
mod tasks;

pub use accounts::AccountsClient;
pub use auth::AuthClient;
pub use billing::BillingClient;
pub use proxies::ProxiesClient;
pub use tasks::TasksClient;
