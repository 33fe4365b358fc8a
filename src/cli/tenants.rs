use anyhow::Result;
use clap::Args;

use super::OutputFormat;
use crate::api::Tenant;
use crate::app::App;
use crate::utils::format::fit_width;

const TENANT_WIDTH: usize = 24;

/// List tenants and their enabled login methods
#[derive(Debug, Args)]
pub struct TenantsCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl TenantsCommand {
    pub async fn execute(&self, app: &App) -> Result<()> {
        let tenants = app.tenants().await?;
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tenants)?),
            OutputFormat::Text => print!("{}", render_tenants(&tenants)),
        }
        Ok(())
    }
}

fn render_tenants(tenants: &[Tenant]) -> String {
    if tenants.is_empty() {
        return "No tenants found\n".to_string();
    }

    let mut out = format!("{} LOGIN METHODS\n", fit_width("TENANT", TENANT_WIDTH));
    for tenant in tenants {
        let methods = tenant.enabled_methods();
        let methods = if methods.is_empty() {
            "none".to_string()
        } else {
            methods.join(", ")
        };
        out.push_str(&format!("{} {}\n", fit_width(&tenant.tenant_id, TENANT_WIDTH), methods));
    }
    out
}
