//! Product backend HTTP client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use shelfdesk_core::{Product, ProductDraft, ProductId};

use super::ProductApiError;
use super::types::{DeleteProductRequest, MessageResponse, ProductListResponse, UpdateProductRequest};
use crate::config::ProductApiConfig;

const PRODUCT_LIST_PATH: &str = "/api/v1/product-list";
const PRODUCT_CREATE_PATH: &str = "/api/v1/product-create";
const PRODUCT_UPDATE_PATH: &str = "/api/v1/product-update";
const PRODUCT_DELETE_PATH: &str = "/api/v1/product-hard-delete";

const PRODUCT_LIST_KEY: &str = "product-list";

/// Maximum number of response body characters kept for logs and errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Client for the product backend API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the cache.
///
/// # Caching
///
/// The product list is cached for `cache_ttl`. Every successful mutation
/// invalidates the whole cache so the next read reflects backend state. A
/// list fetch that started before an invalidation does not write its (possibly
/// stale) result back into the cache.
#[derive(Clone)]
pub struct ProductApiClient {
    inner: Arc<ProductApiClientInner>,
}

struct ProductApiClientInner {
    client: reqwest::Client,
    config: ProductApiConfig,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
    /// Bumped on every invalidation.
    generation: AtomicU64,
}

impl ProductApiClient {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns `ProductApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ProductApiConfig) -> Result<Self, ProductApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ProductApiClientInner {
                client,
                config: config.clone(),
                cache,
                generation: AtomicU64::new(0),
            }),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetch all products, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the body is not `{ "data": Product[] }`.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ProductApiError> {
        if let Some(products) = self.inner.cache.get(PRODUCT_LIST_KEY).await {
            debug!(count = products.len(), "Cache hit for product list");
            return Ok(products);
        }

        let generation = self.inner.generation.load(Ordering::Acquire);

        let response = self
            .inner
            .client
            .get(self.inner.config.endpoint(PRODUCT_LIST_PATH))
            .send()
            .await?;
        let body: ProductListResponse = decode(response).await?;
        let products = Arc::new(body.data);

        if self.inner.generation.load(Ordering::Acquire) == generation {
            self.inner
                .cache
                .insert(PRODUCT_LIST_KEY, Arc::clone(&products))
                .await;
            // An invalidation that ran during the insert must still win
            if self.inner.generation.load(Ordering::Acquire) != generation {
                self.inner.cache.invalidate_all();
            }
        } else {
            debug!("Product list changed during fetch, not caching");
        }

        debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }

    /// Find a single product in the list.
    ///
    /// The backend has no single-product endpoint, so this reads the cached list.
    ///
    /// # Errors
    ///
    /// Returns `ProductApiError::NotFound` if no product has this id, or any
    /// error from [`Self::list_products`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_product(&self, id: &ProductId) -> Result<Product, ProductApiError> {
        self.list_products()
            .await?
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ProductApiError::NotFound(format!("Product not found: {id}")))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a product. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Option<String>, ProductApiError> {
        self.mutate(PRODUCT_CREATE_PATH, draft).await
    }

    /// Update a product. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<String>, ProductApiError> {
        self.mutate(
            PRODUCT_UPDATE_PATH,
            &UpdateProductRequest { id, fields: draft },
        )
        .await
    }

    /// Permanently delete a product. Returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Option<String>, ProductApiError> {
        self.mutate(PRODUCT_DELETE_PATH, &DeleteProductRequest { id })
            .await
    }

    /// Drop every cached read so the next one goes to the backend.
    pub fn revalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.cache.invalidate_all();
        debug!("Product cache invalidated");
    }

    /// POST a JSON body and revalidate the cache on any 2xx.
    ///
    /// The body only supplies the optional toast message; an empty or
    /// non-JSON body still counts as success.
    async fn mutate<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<String>, ProductApiError> {
        let response = self
            .inner
            .client
            .post(self.inner.config.endpoint(path))
            .json(body)
            .send()
            .await?;

        let text = read_body(response).await?;
        self.revalidate();

        Ok(success_message(&text))
    }
}

/// Pull a non-blank `message` out of a mutation response body.
fn success_message(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<MessageResponse>(text) {
        Ok(body) => body.message.filter(|m| !m.trim().is_empty()),
        Err(e) => {
            debug!(error = %e, body = %excerpt(text), "Mutation response has no JSON message");
            None
        }
    }
}

/// Check the status and return the body text.
async fn read_body(response: reqwest::Response) -> Result<String, ProductApiError> {
    let status = response.status();
    let url = response.url().path().to_string();

    // Get response body as text first for better error diagnostics
    let text = response.text().await?;

    if !status.is_success() {
        let body = excerpt(&text);
        tracing::error!(
            status = %status,
            path = %url,
            body = %body,
            "Product API returned non-success status"
        );
        return Err(ProductApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(text)
}

/// Check the status and parse the JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProductApiError> {
    let url = response.url().path().to_string();
    let text = read_body(response).await?;

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            path = %url,
            body = %excerpt(&text),
            "Failed to parse product API response"
        );
        ProductApiError::Parse(e)
    })
}

fn excerpt(text: &str) -> String {
    text.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use std::time::Duration;

    use super::*;
    use crate::test_support::{FakeBackend, MutationReply, sample_products};

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Stoneware".to_string(),
            price: Decimal::new(1299, 2),
            stock: 5,
        }
    }

    fn client(backend: &FakeBackend) -> ProductApiClient {
        ProductApiClient::new(&backend.config().product_api).unwrap()
    }

    #[tokio::test]
    async fn test_list_is_cached() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);

        let first = client.list_products().await.unwrap();
        let second = client.list_products().await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_successful_mutation_revalidates() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);

        client.list_products().await.unwrap();
        let message = client.create_product(&draft("Bowl")).await.unwrap();
        assert_eq!(message.as_deref(), Some("Product created"));

        let products = client.list_products().await.unwrap();
        assert_eq!(backend.list_calls(), 2);
        assert!(products.iter().any(|p| p.name == "Bowl"));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);
        client.list_products().await.unwrap();

        backend.fail_mutations(true);
        let err = client
            .delete_product(&ProductId::from_number(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductApiError::Status { status: 500, .. }));

        client.list_products().await.unwrap();
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_sends_numeric_id_and_fields() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);

        let product = client.find_product(&ProductId::parse("2").unwrap()).await.unwrap();
        client.update_product(&product.id, &draft("Teapot XL")).await.unwrap();

        let body = backend.last_body().unwrap();
        assert_eq!(body["id"], 2);
        assert_eq!(body["name"], "Teapot XL");
        assert_eq!(body["price"], 12.99);
        assert_eq!(body["stock"], 5);
    }

    #[tokio::test]
    async fn test_missing_message_is_none() {
        let backend = FakeBackend::start(sample_products()).await;
        backend.reply_with(MutationReply::EmptyObject);
        let client = client(&backend);

        let message = client.delete_product(&ProductId::from_number(3)).await.unwrap();
        assert!(message.is_none());
        assert_eq!(backend.products().len(), 2);
    }

    #[tokio::test]
    async fn test_bodyless_success_revalidates() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);
        client.list_products().await.unwrap();

        backend.reply_with(MutationReply::NoContent);
        let message = client.delete_product(&ProductId::from_number(3)).await.unwrap();
        assert!(message.is_none());

        backend.reply_with(MutationReply::PlainText);
        let message = client.create_product(&draft("Bowl")).await.unwrap();
        assert!(message.is_none());

        let products = client.list_products().await.unwrap();
        assert_eq!(backend.list_calls(), 2);
        assert!(products.iter().all(|p| p.id != ProductId::from_number(3)));
        assert!(products.iter().any(|p| p.name == "Bowl"));
    }

    #[tokio::test]
    async fn test_list_started_before_mutation_is_not_cached() {
        let backend = FakeBackend::start(sample_products()).await;
        backend.delay_list(Duration::from_millis(300));
        let client = client(&backend);

        let slow = tokio::spawn({
            let client = client.clone();
            async move { client.list_products().await.unwrap() }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.create_product(&draft("Bowl")).await.unwrap();

        // The slow read saw the pre-create snapshot and must not stick
        let stale = slow.await.unwrap();
        assert!(stale.iter().all(|p| p.name != "Bowl"));

        backend.delay_list(Duration::ZERO);
        let fresh = client.list_products().await.unwrap();
        assert!(fresh.iter().any(|p| p.name == "Bowl"));
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_find_unknown_product() {
        let backend = FakeBackend::start(sample_products()).await;
        let client = client(&backend);

        let err = client
            .find_product(&ProductId::parse("99").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_failure_is_status_error() {
        let backend = FakeBackend::start(sample_products()).await;
        backend.fail_list(true);
        let client = client(&backend);

        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, ProductApiError::Status { status: 503, .. }));
    }
}
