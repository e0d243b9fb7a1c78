//! Error types for the catalog fetch path

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid page window: {0}")]
    InvalidWindow(String),
}

pub type FetchResult<T> = Result<T, FetchError>;
