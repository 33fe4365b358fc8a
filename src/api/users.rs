//! User list, count and creation endpoints

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::client::{ensure_ok, tenant_path, ApiClient};
use super::errors::ApiResult;
use super::types::{
    CreateEmailPasswordUserRequest, CreateUserOutcome, UserRecord, UsersCountResponse,
    UsersListResponse,
};
use crate::pagination::{Cursor, FetchFailure, PageBatch, PageSource};

const USERS_PATH: &str = "/api/users";
const USERS_COUNT_PATH: &str = "/api/users/count";
const CREATE_EMAIL_PASSWORD_USER_PATH: &str = "/api/user/emailpassword";

/// Users of one tenant, fetched through the dashboard API
#[derive(Debug)]
pub struct UserListService {
    client: Arc<ApiClient>,
    tenant: String,
    batch_size: AtomicUsize,
}

impl UserListService {
    pub fn new(client: Arc<ApiClient>, tenant: impl Into<String>, batch_size: usize) -> Self {
        Self {
            client,
            tenant: tenant.into(),
            batch_size: AtomicUsize::new(batch_size.max(1)),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.load(Ordering::Relaxed)
    }

    /// Number of users requested per fetch; follows the page size
    pub fn set_batch_size(&self, batch_size: usize) {
        self.batch_size.store(batch_size.max(1), Ordering::Relaxed);
    }

    fn list_query(&self, cursor: Option<&Cursor>) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.batch_size().to_string())];
        if let Some(cursor) = cursor {
            query.push(("paginationToken", cursor.as_str().to_string()));
        }
        query
    }

    /// One batch of users and the token for the next batch
    pub async fn list_users(
        &self,
        cursor: Option<&Cursor>,
    ) -> ApiResult<(Vec<UserRecord>, Option<Cursor>)> {
        let path = tenant_path(&self.tenant, USERS_PATH);
        let response: UsersListResponse = self.client.get(&path, &self.list_query(cursor)).await?;
        ensure_ok(&response.status)?;

        let next = response
            .next_pagination_token
            .filter(|token| !token.is_empty())
            .map(Cursor::new);
        debug!(
            tenant = %self.tenant,
            received = response.users.len(),
            has_more = next.is_some(),
            "users batch received"
        );
        Ok((response.users, next))
    }

    /// Total reported by the backend; may lag behind the list
    pub async fn count_users(&self) -> ApiResult<usize> {
        let path = tenant_path(&self.tenant, USERS_COUNT_PATH);
        let response: UsersCountResponse = self.client.get(&path, &[]).await?;
        ensure_ok(&response.status)?;
        Ok(response.count)
    }

    pub async fn create_email_password_user(
        &self,
        email: &str,
        password: &str,
    ) -> ApiResult<CreateUserOutcome> {
        let path = tenant_path(&self.tenant, CREATE_EMAIL_PASSWORD_USER_PATH);
        let body = CreateEmailPasswordUserRequest { email, password };
        self.client.post(&path, &body).await
    }
}

#[async_trait]
impl PageSource<UserRecord> for UserListService {
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
    ) -> Result<PageBatch<UserRecord>, FetchFailure> {
        let ((records, next_cursor), count) =
            tokio::try_join!(self.list_users(cursor), self.count_users())?;
        Ok(PageBatch::new(records, next_cursor, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClientOptions;

    fn service(tenant: &str) -> UserListService {
        let client = ApiClient::new(ApiClientOptions::default()).unwrap();
        UserListService::new(Arc::new(client), tenant, 10)
    }

    #[test]
    fn test_first_batch_query_has_no_token() {
        let service = service("public");
        assert_eq!(service.list_query(None), vec![("limit", "10".to_string())]);
    }

    #[test]
    fn test_cursor_is_replayed_verbatim() {
        let service = service("acme");
        let cursor = Cursor::from("opaque==token");
        assert_eq!(
            service.list_query(Some(&cursor)),
            vec![
                ("limit", "10".to_string()),
                ("paginationToken", "opaque==token".to_string())
            ]
        );
    }

    #[test]
    fn test_batch_size_follows_page_size() {
        let service = service("public");
        service.set_batch_size(50);
        assert_eq!(service.batch_size(), 50);
        service.set_batch_size(0);
        assert_eq!(service.batch_size(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_fetch_failure() {
        let client = ApiClient::new(ApiClientOptions {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap();
        let service = UserListService::new(Arc::new(client), "public", 10);

        let outcome = service.fetch_page(None).await;
        assert!(outcome.is_err());
    }
}
