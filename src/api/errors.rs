//! Error types for the dashboard API client

use crate::pagination::FetchFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned status {0}")]
    Backend(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ApiError> for FetchFailure {
    fn from(error: ApiError) -> Self {
        FetchFailure::new(error.to_string())
    }
}
