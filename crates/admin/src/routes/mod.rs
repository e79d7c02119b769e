//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /                           - Redirect to /products
//!
//! # Products (backed by the product API)
//! GET  /products                   - Products page
//! GET  /products/table             - Table fragment (HTMX refresh target)
//! GET  /products/new               - Create dialog
//! POST /products                   - Create product
//! GET  /products/{id}/edit         - Update dialog
//! POST /products/{id}              - Update product
//! GET  /products/{id}/delete       - Delete confirmation dialog
//! POST /products/{id}/delete       - Delete product
//! ```

pub mod products;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Static assets, relative to the workspace root.
const STATIC_DIR: &str = "crates/admin/static";

/// Product screen routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/products") }))
        .route("/products", get(products::index).post(products::create))
        .route("/products/table", get(products::table))
        .route("/products/new", get(products::new_dialog))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit_dialog))
        .route(
            "/products/{id}/delete",
            get(products::delete_dialog).post(products::delete),
        )
}

/// Full application router: routes, static files, and per-request middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<_>| {
                            tracing::info_span!(
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = tracing::field::Empty,
                                status = tracing::field::Empty,
                                latency_ms = tracing::field::Empty,
                            )
                        })
                        .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                            span.record("status", response.status().as_u16());
                            span.record(
                                "latency_ms",
                                u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                            );
                            DefaultOnResponse::default().on_response(response, latency, span);
                        }),
                )
                // Inside the trace span so the ID lands on it
                .layer(from_fn(request_id_middleware))
                .layer(from_fn(security_headers_middleware)),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
