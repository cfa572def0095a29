//! Command execution against the console API.

use std::sync::Arc;

use console_client::ConsoleClient;
use console_client::resources::models::TaskStatus;
use console_client::session::FileStorage;
use uuid::Uuid;

use crate::cli::{
    AccountCommands, BillingCommands, Commands, OutputFormat, ProxyCommands, TaskCommands,
};
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::output::Output;

pub struct CommandExecutor {
    client: ConsoleClient,
    output: Output,
}

impl CommandExecutor {
    pub async fn new(
        config: &AppConfig,
        api_url_override: Option<String>,
        format: OutputFormat,
    ) -> Result<Self> {
        let api_url = api_url_override.unwrap_or_else(|| config.api_url.clone());
        let storage = Arc::new(FileStorage::new(config.session_path()?));
        let client = ConsoleClient::new(api_url, storage)?;
        // Pick up a session persisted by a previous invocation.
        client.restore().await?;

        Ok(Self {
            client,
            output: Output::new(format),
        })
    }

    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { email, password } => self.login(&email, password).await,
            Commands::Logout => {
                self.client.auth().logout().await?;
                self.output.message("Logged out")
            }
            Commands::Whoami => self.whoami().await,
            Commands::Accounts { command } => self.accounts(command).await,
            Commands::Proxies { command } => self.proxies(command).await,
            Commands::Tasks { command } => self.tasks(command).await,
            Commands::Billing { command } => self.billing(command).await,
        }
    }

    async fn login(&self, email: &str, password: Option<String>) -> Result<()> {
        let password = match password {
            Some(p) => p,
            None => inquire::Password::new("Password:")
                .without_confirmation()
                .prompt()?,
        };

        let user = self.client.auth().login(email, &password).await?;
        self.output
            .message(&format!("Logged in as {}", user.email))
    }

    async fn whoami(&self) -> Result<()> {
        if !self.client.session().is_authenticated() {
            return Err(CliError::NotLoggedIn);
        }
        // Refetch so the answer reflects the server, not a stale snapshot.
        let user = self.client.auth().me().await?;
        self.output.user(&user)
    }

    async fn accounts(&self, command: AccountCommands) -> Result<()> {
        let client = self.client.accounts();
        match command {
            AccountCommands::List => self.output.accounts(&client.list().await?),
            AccountCommands::Get { id } => {
                let account = client.get(parse_id(&id)?).await?;
                self.output.accounts(std::slice::from_ref(&account))
            }
            AccountCommands::Connect { id } => {
                let state = client.connect(parse_id(&id)?).await?;
                self.output.account_state(&state)
            }
            AccountCommands::Disconnect { id } => {
                client.disconnect(parse_id(&id)?).await?;
                self.output.message("Disconnected")
            }
            AccountCommands::Status { id } => {
                let state = client.status(parse_id(&id)?).await?;
                self.output.account_state(&state)
            }
            AccountCommands::Delete { id } => {
                client.delete(parse_id(&id)?).await?;
                self.output.message("Deleted")
            }
        }
    }

    async fn proxies(&self, command: ProxyCommands) -> Result<()> {
        let client = self.client.proxies();
        match command {
            ProxyCommands::List => self.output.proxies(&client.list().await?),
            ProxyCommands::Get { id } => {
                let proxy = client.get(parse_id(&id)?).await?;
                self.output.proxies(std::slice::from_ref(&proxy))
            }
            ProxyCommands::Test { id } => {
                let result = client.test(parse_id(&id)?).await?;
                self.output.proxy_test(&result)
            }
            ProxyCommands::Delete { id } => {
                client.delete(parse_id(&id)?).await?;
                self.output.message("Deleted")
            }
        }
    }

    async fn tasks(&self, command: TaskCommands) -> Result<()> {
        let client = self.client.tasks();
        match command {
            TaskCommands::List { status } => {
                let status = status.as_deref().map(parse_task_status).transpose()?;
                self.output.tasks(&client.list(status).await?)
            }
            TaskCommands::Get { id } => {
                let task = client.get(parse_id(&id)?).await?;
                self.output.tasks(std::slice::from_ref(&task))
            }
            TaskCommands::Progress { id } => {
                let progress = client.progress(parse_id(&id)?).await?;
                self.output.task_progress(&progress)
            }
            TaskCommands::Cancel { id } => {
                client.cancel(parse_id(&id)?).await?;
                self.output.message("Cancelled")
            }
        }
    }

    async fn billing(&self, command: BillingCommands) -> Result<()> {
        let client = self.client.billing();
        match command {
            BillingCommands::Plans => self.output.plans(&client.plans().await?),
            BillingCommands::Subscription => self.output.subscription(&client.subscription().await?),
            BillingCommands::Invoices => self.output.invoices(&client.invoices().await?),
            BillingCommands::Portal => self.output.portal(&client.portal().await?),
        }
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| CliError::InvalidArgument(format!("Not a valid id: {raw}")))
}

fn parse_task_status(raw: &str) -> Result<TaskStatus> {
    match raw {
        "pending" => Ok(TaskStatus::Pending),
        "running" => Ok(TaskStatus::Running),
        "completed" => Ok(TaskStatus::Completed),
        "failed" => Ok(TaskStatus::Failed),
        "cancelled" => Ok(TaskStatus::Cancelled),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown task status: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_parsing() {
        assert_eq!(parse_task_status("pending").unwrap(), TaskStatus::Pending);
        assert_eq!(parse_task_status("failed").unwrap(), TaskStatus::Failed);
        assert!(parse_task_status("bogus").is_err());
    }

    #[test]
    fn id_parsing_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
        assert!(parse_id("5f6bbec5-57ff-44f2-a1b4-ddca42fbd853").is_ok());
    }
}
