//! Products page and table fragment handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::{
    components::products_table_config,
    filters,
    services::listing::{self, ListingQuery},
    state::AppState,
};

use super::types::ProductTableView;

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: String,
    pub search_placeholder: String,
    pub table: ProductTableView,
}

/// Products table partial template (for HTMX refreshes).
#[derive(Template, WebTemplate)]
#[template(path = "products/_table.html")]
pub struct ProductsTableTemplate {
    pub table: ProductTableView,
}

/// Products page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ProductsIndexTemplate {
    let config = products_table_config();

    ProductsIndexTemplate {
        current_path: "/products".to_string(),
        search_placeholder: config.search_placeholder,
        table: load_table(&state, &query).await,
    }
}

/// Table fragment handler, re-fetched after every mutation.
#[instrument(skip(state))]
pub async fn table(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ProductsTableTemplate {
    ProductsTableTemplate {
        table: load_table(&state, &query).await,
    }
}

async fn load_table(state: &AppState, query: &ListingQuery) -> ProductTableView {
    let config = products_table_config();

    match state.api().list_products().await {
        Ok(products) => {
            let page = listing::apply(&products, query, state.config().products_per_page);
            ProductTableView::new(&config, query, &page)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            ProductTableView::unavailable(&config, query)
        }
    }
}
