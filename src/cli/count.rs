use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::utils::format::format_number;

/// Print the number of users in the tenant
#[derive(Debug, Args)]
pub struct CountCommand {
    /// Print the bare number without separators
    #[arg(short = 'r', long = "raw")]
    pub raw: bool,
}

impl CountCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        let count = app.count_users().await?;
        if self.raw {
            println!("{}", count);
        } else {
            println!(
                "{} users in tenant '{}'",
                format_number(count),
                app.config().tenant
            );
        }
        Ok(())
    }
}
