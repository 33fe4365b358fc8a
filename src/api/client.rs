//! HTTP client for the dashboard API

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use super::errors::{ApiError, ApiResult};

/// Tenant whose routes are served without a tenant prefix
pub const PUBLIC_TENANT: &str = "public";

/// Prefix `path` with the tenant segment unless it is the public tenant
pub fn tenant_path(tenant: &str, path: &str) -> String {
    if tenant.is_empty() || tenant == PUBLIC_TENANT {
        path.to_string()
    } else {
        format!("/{}{}", tenant, path)
    }
}

/// Options used to build an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiClientOptions {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/auth/dashboard".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("roster/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Thin JSON wrapper around a configured `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(options: ApiClientOptions) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = options.api_key.as_deref().filter(|key| !key.is_empty()) {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ApiError::Config(format!("Invalid API key: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .user_agent(&options.user_agent)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).query(query).send().await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Reject responses whose `status` field is not `OK`
pub(crate) fn ensure_ok(status: &str) -> ApiResult<()> {
    if status == super::types::STATUS_OK {
        Ok(())
    } else {
        Err(ApiError::Backend(status.to_string()))
    }
}
