//! Integration tests for Shelfdesk.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - a fake product backend implementing the `/api/v1/product-*` endpoints
//!   in memory, and
//! - the admin router (the same one the binary serves) pointed at it,
//!
//! then drives the admin over real HTTP with `reqwest`, the way HTMX does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shelfdesk-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use shelfdesk_admin::{AppState, config::AdminConfig, router};
use shelfdesk_core::Product;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory product backend state.
#[derive(Default)]
struct Catalog {
    products: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    failing: AtomicBool,
}

type Reply = (StatusCode, Json<Value>);

/// Fake product backend with string ids (`sku-1`, `sku-2`, ...).
pub struct FakeBackend {
    pub base_url: String,
    catalog: Arc<Catalog>,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn spawn(products: Vec<Value>) -> Self {
        let catalog = Arc::new(Catalog {
            next_id: AtomicUsize::new(products.len() + 1),
            products: Mutex::new(products),
            ..Catalog::default()
        });

        let app = Router::new()
            .route("/api/v1/product-list", get(list))
            .route("/api/v1/product-create", post(create))
            .route("/api/v1/product-update", post(update))
            .route("/api/v1/product-hard-delete", post(hard_delete))
            .with_state(Arc::clone(&catalog));

        let (base_url, handle) = serve(app).await;
        Self {
            base_url,
            catalog,
            handle,
        }
    }

    /// Make every mutation answer 500.
    pub fn set_failing(&self, failing: bool) {
        self.catalog.failing.store(failing, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.catalog.list_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.catalog.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn products(&self) -> Vec<Value> {
        self.catalog.products.lock().unwrap().clone()
    }

    /// Change a product behind the admin's back (another admin, a job).
    pub fn rename_directly(&self, id: &str, name: &str) {
        let mut products = self.catalog.products.lock().unwrap();
        if let Some(product) = products.iter_mut().find(|p| p["id"] == id) {
            product["name"] = json!(name);
        }
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Admin server plus its backend.
pub struct TestContext {
    pub client: reqwest::Client,
    pub admin_url: String,
    pub backend: FakeBackend,
    handle: JoinHandle<()>,
}

impl TestContext {
    /// Start a backend holding `products` and an admin in front of it.
    pub async fn spawn(products: Vec<Value>) -> Self {
        let backend = FakeBackend::spawn(products).await;

        let base_url = backend.base_url.clone();
        let config = AdminConfig::from_lookup(move |key| match key {
            "PRODUCT_API_BASE_URL" => Some(base_url.clone()),
            "PRODUCTS_PER_PAGE" => Some("25".to_string()),
            _ => None,
        })
        .expect("valid test configuration");
        let state = AppState::new(config).expect("failed to build app state");

        let (admin_url, handle) = serve(router(state)).await;

        Self {
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap(),
            admin_url,
            backend,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// GET a page or fragment and return status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.text().await.unwrap())
    }

    /// Submit a form as HTMX would; returns status, parsed `HX-Trigger`, body.
    pub async fn submit(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> (reqwest::StatusCode, Option<Value>, String) {
        let res = self
            .client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .unwrap();

        let status = res.status();
        let trigger = res
            .headers()
            .get("hx-trigger")
            .map(|v| serde_json::from_str(v.to_str().unwrap()).unwrap());
        (status, trigger, res.text().await.unwrap())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A small catalog with string ids.
#[must_use]
pub fn catalog() -> Vec<Value> {
    vec![
        json!({"id": "sku-1", "name": "Pour-over Kettle", "description": "Gooseneck, 1L", "price": 42.0, "stock": 12}),
        json!({"id": "sku-2", "name": "Burr Grinder", "description": "Conical burrs", "price": 129.99, "stock": 4}),
        json!({"id": "sku-3", "name": "Paper Filters", "description": "Pack of 100", "price": 6.5, "stock": 300}),
    ]
}

async fn serve(app: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), handle)
}

fn failure(catalog: &Catalog) -> Option<Reply> {
    catalog.mutation_calls.fetch_add(1, Ordering::SeqCst);
    catalog.failing.load(Ordering::SeqCst).then(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "internal error"})),
        )
    })
}

async fn list(State(catalog): State<Arc<Catalog>>) -> Reply {
    catalog.list_calls.fetch_add(1, Ordering::SeqCst);
    let products = catalog.products.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "data": products })))
}

async fn create(State(catalog): State<Arc<Catalog>>, Json(mut body): Json<Value>) -> Reply {
    if let Some(reply) = failure(&catalog) {
        return reply;
    }
    let id = catalog.next_id.fetch_add(1, Ordering::SeqCst);
    body["id"] = json!(format!("sku-{id}"));
    catalog.products.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({"message": "Product created"})))
}

async fn update(State(catalog): State<Arc<Catalog>>, Json(body): Json<Value>) -> Reply {
    if let Some(reply) = failure(&catalog) {
        return reply;
    }
    // Updates carry the full product shape
    if serde_json::from_value::<Product>(body.clone()).is_err() {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "bad product"})));
    }
    let mut products = catalog.products.lock().unwrap();
    match products.iter_mut().find(|p| p["id"] == body["id"]) {
        Some(product) => {
            *product = body;
            (StatusCode::OK, Json(json!({"message": "Product updated"})))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Product not found"}))),
    }
}

async fn hard_delete(State(catalog): State<Arc<Catalog>>, Json(body): Json<Value>) -> Reply {
    if let Some(reply) = failure(&catalog) {
        return reply;
    }
    catalog
        .products
        .lock()
        .unwrap()
        .retain(|p| p["id"] != body["id"]);
    (StatusCode::OK, Json(json!({"message": "Product deleted"})))
}
