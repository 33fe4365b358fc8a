//! Core application logic and orchestration
//!
//! [`App`] wires the configuration to the dashboard API and hands out the
//! services both front ends use: the interactive TUI and the one-shot CLI
//! commands.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{
    ApiClient, CreateUserOutcome, Tenant, TenantService, UserListService, UserRecord,
};
use crate::config::Config;
use crate::pagination::{drive, Completion, ListSnapshot, PageSource, PaginationController};
use crate::tui;

/// Main application structure
pub struct App {
    config: Config,
    client: Arc<ApiClient>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        debug!("Creating new App instance");
        config.validate()?;

        let client = ApiClient::new(config.client_options()?)
            .context("Failed to create API client")?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Users of the configured tenant, fetched `batch_size` at a time
    pub fn user_service(&self, batch_size: usize) -> UserListService {
        UserListService::new(self.client.clone(), self.config.tenant.as_str(), batch_size)
    }

    pub fn tenant_service(&self) -> TenantService {
        TenantService::new(self.client.clone())
    }

    /// Walk to the 1-based `page` of `limit` users.
    ///
    /// Stops at the last page when `page` lies past the end of the list.
    pub async fn list_page(&self, page: usize, limit: usize) -> Result<ListSnapshot<UserRecord>> {
        let service = self.user_service(limit);
        Self::walk_to_page(&service, page, limit).await
    }

    async fn walk_to_page<R, S>(source: &S, page: usize, limit: usize) -> Result<ListSnapshot<R>>
    where
        R: Clone,
        S: PageSource<R> + ?Sized,
    {
        let mut controller = PaginationController::new(limit);

        let navigation = controller.load();
        Self::settle(drive(&mut controller, source, navigation).await)?;

        for _ in 1..page.max(1) {
            if !controller.can_go_next() {
                debug!(page, offset = controller.offset(), "no page after this one");
                break;
            }
            let navigation = controller.go_to_next();
            Self::settle(drive(&mut controller, source, navigation).await)?;
        }

        Ok(controller.snapshot())
    }

    fn settle(completion: Option<Completion>) -> Result<()> {
        match completion {
            Some(Completion::Failed { offset }) => Err(anyhow!(
                "Failed to load users starting at #{}; run with --debug for details",
                offset + 1
            )),
            _ => Ok(()),
        }
    }

    /// Total users of the configured tenant as reported by the backend
    pub async fn count_users(&self) -> Result<usize> {
        self.user_service(1)
            .count_users()
            .await
            .context("Failed to count users")
    }

    pub async fn tenants(&self) -> Result<Vec<Tenant>> {
        self.tenant_service()
            .fetch_login_methods()
            .await
            .context("Failed to load tenants")
    }

    pub async fn create_email_password_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreateUserOutcome> {
        info!(tenant = %self.config.tenant, "Creating email password user");
        self.user_service(1)
            .create_email_password_user(email, password)
            .await
            .context("Failed to create user")
    }

    /// Run the application in interactive mode (TUI)
    pub async fn run_interactive(&self) -> Result<()> {
        info!(
            api_url = %self.config.api_url,
            tenant = %self.config.tenant,
            "Starting interactive mode"
        );
        tui::run(
            self.client.clone(),
            &self.config.tenant,
            self.config.page_size,
        )
        .await
    }
}
