//! Cart client error types

use thiserror::Error;

/// Errors talking to the cart proxy.
#[derive(Debug, Error)]
pub enum CartClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Proxy rejected the request (4xx)
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Proxy or platform failed (5xx and anything else unexpected)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for cart proxy calls
pub type ClientResult<T> = Result<T, CartClientError>;

/// Errors reading or writing the persisted cart ID.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cart ID store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cart ID store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
