use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use super::completions::CompletionsCommand;
use super::count::CountCommand;
use super::create::CreateCommand;
use super::list::ListCommand;
use super::tenants::TenantsCommand;
use crate::app::App;
use crate::config::Config;

/// roster - browse and manage the users of your auth backend from the terminal
#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Browse and manage the users of your auth backend from the terminal",
    long_about = r#"roster talks to a user-management dashboard API and pages through its users.

Examples:
  roster                                  # Start interactive mode
  roster list --page 3 --limit 20         # Print the third page of 20 users
  roster --tenant acme count              # Count the users of a tenant
  roster create emailpassword --email ada@example.com --password 'secret-123'"#
)]
pub struct Cli {
    /// Base URL of the dashboard API
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// Tenant to operate on
    #[arg(short = 't', long = "tenant", global = true)]
    pub tenant: Option<String>,

    /// Users per page
    #[arg(short = 'n', long = "page-size", global = true)]
    pub page_size: Option<usize>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of users
    List(ListCommand),

    /// Print the number of users
    Count(CountCommand),

    /// List tenants and their login methods
    Tenants(TenantsCommand),

    /// Create a user
    Create(CreateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Interactive mode owns the terminal, so it logs to a file
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }

    /// Command line flags take precedence over every other source
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(tenant) = &self.tenant {
            config.tenant = tenant.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        match self.command {
            Some(Commands::Completions(cmd)) => cmd.execute(),
            Some(Commands::List(cmd)) => cmd.execute(&App::new(config)?).await,
            Some(Commands::Count(cmd)) => cmd.execute(&App::new(config)?).await,
            Some(Commands::Tenants(cmd)) => cmd.execute(&App::new(config)?).await,
            Some(Commands::Create(cmd)) => cmd.execute(&App::new(config)?).await,
            None => {
                let app = App::new(config)?;
                app.run_interactive().await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["roster", "--tenant", "acme"]).unwrap();
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::try_parse_from([
            "roster",
            "list",
            "--api-url",
            "https://auth.example.com/dashboard",
            "-n",
            "50",
        ])
        .unwrap();
        assert!(!cli.is_interactive());

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api_url, "https://auth.example.com/dashboard");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.tenant, "public");
    }
}
