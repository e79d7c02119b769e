//! In-process fake of the product backend for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::config::AdminConfig;
use crate::state::AppState;

#[derive(Default)]
struct Backend {
    products: Mutex<Vec<Value>>,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    fail_mutations: AtomicBool,
    fail_list: AtomicBool,
    reply: Mutex<MutationReply>,
    list_delay: Mutex<Duration>,
    mutation_delay: Mutex<Duration>,
    last_body: Mutex<Option<Value>>,
}

/// Shape of a successful mutation response.
#[derive(Debug, Clone, Copy, Default)]
pub enum MutationReply {
    /// `200 {"message": "..."}`
    #[default]
    Message,
    /// `200 {}`
    EmptyObject,
    /// `204` with no body.
    NoContent,
    /// `200` with the message as `text/plain`.
    PlainText,
}

/// Fake backend listening on an ephemeral port.
#[derive(Clone)]
pub struct FakeBackend {
    pub base_url: String,
    backend: Arc<Backend>,
}

impl FakeBackend {
    /// Start a backend serving `products` (JSON objects).
    pub async fn start(products: Vec<Value>) -> Self {
        let backend = Arc::new(Backend {
            products: Mutex::new(products),
            ..Backend::default()
        });

        let app = Router::new()
            .route("/api/v1/product-list", get(list))
            .route("/api/v1/product-create", post(create))
            .route("/api/v1/product-update", post(update))
            .route("/api/v1/product-hard-delete", post(hard_delete))
            .with_state(Arc::clone(&backend));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// Admin config pointing at this backend.
    pub fn config(&self) -> AdminConfig {
        let base_url = self.base_url.clone();
        AdminConfig::from_lookup(move |key| match key {
            "PRODUCT_API_BASE_URL" => Some(base_url.clone()),
            "PRODUCTS_PER_PAGE" => Some("2".to_string()),
            _ => None,
        })
        .unwrap()
    }

    /// App state pointing at this backend.
    pub fn state(&self) -> AppState {
        AppState::new(self.config()).unwrap()
    }

    pub fn list_calls(&self) -> usize {
        self.backend.list_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.backend.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.backend.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.backend.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn reply_with(&self, reply: MutationReply) {
        *self.backend.reply.lock().unwrap() = reply;
    }

    pub fn delay_list(&self, delay: Duration) {
        *self.backend.list_delay.lock().unwrap() = delay;
    }

    pub fn delay_mutations(&self, delay: Duration) {
        *self.backend.mutation_delay.lock().unwrap() = delay;
    }

    /// Body of the most recent mutation request.
    pub fn last_body(&self) -> Option<Value> {
        self.backend.last_body.lock().unwrap().clone()
    }

    pub fn products(&self) -> Vec<Value> {
        self.backend.products.lock().unwrap().clone()
    }
}

/// Sample catalog with numeric ids 1..=3.
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Mug", "description": "Ceramic mug", "price": 8.5, "stock": 40}),
        json!({"id": 2, "name": "Teapot", "description": "Cast iron", "price": 35, "stock": 3}),
        json!({"id": 3, "name": "Green Tea", "description": "Loose leaf", "price": 6, "stock": 80}),
    ]
}

async fn list(State(backend): State<Arc<Backend>>) -> (StatusCode, Json<Value>) {
    backend.list_calls.fetch_add(1, Ordering::SeqCst);
    if backend.fail_list.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "down"})));
    }
    // Snapshot before sleeping, like a slow query started before a write
    let products = backend.products.lock().unwrap().clone();
    let delay = *backend.list_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (StatusCode::OK, Json(json!({ "data": products })))
}

async fn begin_mutation(backend: &Backend, body: &Value) -> Option<(StatusCode, Json<Value>)> {
    backend.mutation_calls.fetch_add(1, Ordering::SeqCst);
    *backend.last_body.lock().unwrap() = Some(body.clone());

    let delay = *backend.mutation_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    backend.fail_mutations.load(Ordering::SeqCst).then(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "database unavailable"})),
        )
    })
}

fn message(backend: &Backend, text: &str) -> Response {
    match *backend.reply.lock().unwrap() {
        MutationReply::Message => (StatusCode::OK, Json(json!({ "message": text }))).into_response(),
        MutationReply::EmptyObject => (StatusCode::OK, Json(json!({}))).into_response(),
        MutationReply::NoContent => StatusCode::NO_CONTENT.into_response(),
        MutationReply::PlainText => (StatusCode::OK, text.to_string()).into_response(),
    }
}

async fn create(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = begin_mutation(&backend, &body).await {
        return failure.into_response();
    }
    let mut products = backend.products.lock().unwrap();
    let next_id = products
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    let mut product = body;
    product["id"] = json!(next_id);
    products.push(product);
    drop(products);
    message(&backend, "Product created")
}

async fn update(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = begin_mutation(&backend, &body).await {
        return failure.into_response();
    }
    let mut products = backend.products.lock().unwrap();
    let Some(product) = products.iter_mut().find(|p| p["id"] == body["id"]) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Product not found"}))).into_response();
    };
    *product = body;
    drop(products);
    message(&backend, "Product updated")
}

async fn hard_delete(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = begin_mutation(&backend, &body).await {
        return failure.into_response();
    }
    backend
        .products
        .lock()
        .unwrap()
        .retain(|p| p["id"] != body["id"]);
    message(&backend, "Product deleted")
}
