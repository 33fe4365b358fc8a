//! Client for the user-management dashboard API
//!
//! Everything network-facing lives here; the rest of the crate only sees
//! [`UserListService`] through the
//! [`PageSource`](crate::pagination::PageSource) trait.

mod client;
mod errors;
mod tenants;
mod types;
mod users;

pub use client::{tenant_path, ApiClient, ApiClientOptions, PUBLIC_TENANT};
pub use errors::{ApiError, ApiResult};
pub use tenants::TenantService;
pub use types::*;
pub use users::UserListService;
