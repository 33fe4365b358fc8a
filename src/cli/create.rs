use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use std::io::{self, BufRead};
use tracing::debug;

use crate::api::CreateUserOutcome;
use crate::app::App;

/// Create a user in the configured tenant
#[derive(Debug, Args)]
pub struct CreateCommand {
    #[command(subcommand)]
    pub command: CreateSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CreateSubcommand {
    /// Create an email + password user
    Emailpassword {
        /// Email address of the new user
        #[arg(short = 'e', long)]
        email: String,

        /// Password; read from the first line of stdin when omitted
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

impl CreateCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        match &self.command {
            CreateSubcommand::Emailpassword { email, password } => {
                let password = match password {
                    Some(password) => password.clone(),
                    None => read_password()?,
                };
                let outcome = app.create_email_password_user(email, &password).await?;
                println!("{}", describe_outcome(&outcome)?);
                Ok(())
            }
        }
    }
}

fn read_password() -> Result<String> {
    debug!("Reading password from stdin");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| anyhow!("Failed to read password from stdin: {}", e))?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow!("No password provided. Use --password or pipe it via stdin."));
    }
    Ok(password)
}

/// Success message, or an error naming what the backend rejected
fn describe_outcome(outcome: &CreateUserOutcome) -> Result<String> {
    match outcome {
        CreateUserOutcome::Ok { user } => Ok(format!("Created user {} ({})", user.id, user.email)),
        CreateUserOutcome::EmailAlreadyExistsError => {
            Err(anyhow!("A user with this email already exists"))
        }
        CreateUserOutcome::EmailValidationError { message } => {
            Err(anyhow!("Invalid email: {}", message))
        }
        CreateUserOutcome::PasswordValidationError { message } => {
            Err(anyhow!("Invalid password: {}", message))
        }
    }
}
