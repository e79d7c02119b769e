//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ProductApiClient, ProductApiError};
use crate::config::AdminConfig;
use crate::services::pending::PendingMutations;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ProductApiClient,
    pending: PendingMutations,
}

impl AppState {
    /// Build the state and its product API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, ProductApiError> {
        let api = ProductApiClient::new(&config.product_api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                pending: PendingMutations::new(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Product backend client (with the list cache).
    #[must_use]
    pub fn api(&self) -> &ProductApiClient {
        &self.inner.api
    }

    /// In-flight mutations.
    #[must_use]
    pub fn pending(&self) -> &PendingMutations {
        &self.inner.pending
    }
}
