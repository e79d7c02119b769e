//! Product backend API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The backend is the source of truth - no local persistence
//! - The product list is cached in memory via `moka` and invalidated
//!   wholesale after every successful mutation
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/v1/product-list         -> { "data": Product[] }
//! POST /api/v1/product-create       -> { "message": string }
//! POST /api/v1/product-update       -> { "message": string }
//! POST /api/v1/product-hard-delete  -> { "message": string }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfdesk_admin::api::ProductApiClient;
//!
//! let client = ProductApiClient::new(&config.product_api)?;
//!
//! let products = client.list_products().await?;
//! let message = client.delete_product(&products[0].id).await?;
//! ```

mod client;
pub mod types;

pub use client::ProductApiClient;

use thiserror::Error;

/// Errors that can occur when talking to the product backend.
#[derive(Debug, Error)]
pub enum ProductApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body, for logs.
        body: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product is not in the backend's list.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ProductApiError {
    /// Whether the backend reported that the product does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }
}
