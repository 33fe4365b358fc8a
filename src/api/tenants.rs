//! Tenant discovery

use std::sync::Arc;

use super::client::{ensure_ok, ApiClient};
use super::errors::ApiResult;
use super::types::{Tenant, TenantsLoginMethodsResponse};

const LOGIN_METHODS_PATH: &str = "/api/tenants/login-methods";

#[derive(Debug, Clone)]
pub struct TenantService {
    client: Arc<ApiClient>,
}

impl TenantService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Every tenant with the login methods enabled for it
    pub async fn fetch_login_methods(&self) -> ApiResult<Vec<Tenant>> {
        let response: TenantsLoginMethodsResponse =
            self.client.get(LOGIN_METHODS_PATH, &[]).await?;
        ensure_ok(&response.status)?;
        Ok(response.tenants)
    }
}
