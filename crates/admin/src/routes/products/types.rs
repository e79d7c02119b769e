//! View models and form inputs for the products screen.

use serde::Deserialize;
use shelfdesk_core::{FieldErrors, Product, ProductField, ProductForm};
use uuid::Uuid;

use crate::components::data_table::{ColumnHeader, DataTableConfig};
use crate::services::listing::{ListingPage, ListingQuery};

// =============================================================================
// Table
// =============================================================================

/// Product row for display in the table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    /// `id` encoded for use in URLs.
    pub path_id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            path_id: encode_path_segment(product.id.as_str()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.display_price(),
            stock: product.stock,
        }
    }
}

/// Everything the table fragment needs, on the page and on refresh.
#[derive(Debug, Clone)]
pub struct ProductTableView {
    pub table_id: String,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<ProductRowView>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    /// Query string (without `?`) of the previous page, if any.
    pub prev_query: Option<String>,
    /// Query string (without `?`) of the next page, if any.
    pub next_query: Option<String>,
    /// Query string reproducing the current view, for refreshes.
    pub current_query: String,
    pub search: Option<String>,
    pub empty_title: String,
    pub empty_description: Option<String>,
    /// Backend could not be reached; rows are empty.
    pub load_failed: bool,
}

/// Query string for `query` moved to `page`.
#[must_use]
pub fn page_query(query: &ListingQuery, page: usize) -> String {
    let mut pairs = url::form_urlencoded::Serializer::new(String::new());
    if let Some(search) = query.search() {
        pairs.append_pair("q", search);
    }
    if let Some(key) = query.sort.as_deref().filter(|_| query.sort_key().is_some()) {
        pairs.append_pair("sort", key);
        pairs.append_pair("dir", if query.is_descending() { "desc" } else { "asc" });
    }
    if page > 1 {
        pairs.append_pair("page", &page.to_string());
    }
    pairs.finish()
}

impl ProductTableView {
    /// Assemble the table for one listing page.
    #[must_use]
    pub fn new(
        config: &DataTableConfig,
        query: &ListingQuery,
        listing: &ListingPage,
    ) -> Self {
        let sort = query.sort_key().and(query.sort.as_deref());

        Self {
            table_id: config.table_id.clone(),
            headers: config.headers(sort, query.is_descending(), query.search()),
            rows: listing.products.iter().map(ProductRowView::from).collect(),
            total: listing.total,
            page: listing.page,
            page_count: listing.page_count,
            prev_query: listing
                .has_prev()
                .then(|| page_query(query, listing.page - 1)),
            next_query: listing
                .has_next()
                .then(|| page_query(query, listing.page + 1)),
            current_query: page_query(query, listing.page),
            search: query.search().map(String::from),
            empty_title: config.empty_title.clone(),
            empty_description: config.empty_description.clone(),
            load_failed: false,
        }
    }

    /// Empty table shown when the backend list cannot be loaded.
    #[must_use]
    pub fn unavailable(config: &DataTableConfig, query: &ListingQuery) -> Self {
        let mut view = Self::new(
            config,
            query,
            &ListingPage {
                products: vec![],
                total: 0,
                page: 1,
                page_count: 1,
            },
        );
        view.load_failed = true;
        view
    }
}

// =============================================================================
// Dialogs
// =============================================================================

/// Which dialog a product form belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Create, with the token identifying this dialog instance.
    Create { form_token: Uuid },
    /// Update of the product with this id.
    Update { product_id: String },
}

/// Submitted values and messages for one form field.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub error: Option<String>,
}

/// Create/update dialog contents.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub title: &'static str,
    pub description: &'static str,
    pub action: String,
    pub form_token: Option<String>,
    pub fields: Vec<FieldView>,
}

impl ProductFormView {
    /// Build a dialog for `mode` holding `form`'s values and any `errors`.
    #[must_use]
    pub fn new(mode: &FormMode, form: &ProductForm, errors: &FieldErrors) -> Self {
        let (title, description, action, form_token) = match mode {
            FormMode::Create { form_token } => (
                "Add New Product",
                "Fill in the details below to create a new product.",
                "/products".to_string(),
                Some(form_token.to_string()),
            ),
            FormMode::Update { product_id } => (
                "Update Product",
                "Modify the fields below and save to update this product.",
                format!("/products/{}", encode_path_segment(product_id)),
                None,
            ),
        };

        let field = |field: ProductField, label, input_type, value: &str| FieldView {
            name: field.as_str(),
            label,
            input_type,
            value: value.to_string(),
            error: errors.get(field).map(String::from),
        };

        Self {
            title,
            description,
            action,
            form_token,
            fields: vec![
                field(ProductField::Name, "Product Name", "text", &form.name),
                field(
                    ProductField::Description,
                    "Product Description",
                    "text",
                    &form.description,
                ),
                field(ProductField::Stock, "Stocks", "number", &form.stock),
                field(ProductField::Price, "Price", "number", &form.price),
            ],
        }
    }
}

/// Delete confirmation contents.
#[derive(Debug, Clone)]
pub struct DeleteDialogView {
    pub action: String,
    pub product_name: String,
}

impl From<&Product> for DeleteDialogView {
    fn from(product: &Product) -> Self {
        Self {
            action: format!(
                "/products/{}/delete",
                encode_path_segment(product.id.as_str())
            ),
            product_name: product.name.clone(),
        }
    }
}

// =============================================================================
// Form inputs
// =============================================================================

/// Create/update form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductFormInput {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    /// Present on create dialogs only.
    pub form_token: Option<String>,
}

impl ProductFormInput {
    /// The product fields of the submission.
    #[must_use]
    pub fn form(&self) -> ProductForm {
        ProductForm {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            stock: self.stock.clone(),
        }
    }

    /// The create dialog token, or a fresh one when missing or malformed.
    #[must_use]
    pub fn form_token(&self) -> Uuid {
        self.form_token
            .as_deref()
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .unwrap_or_else(Uuid::new_v4)
    }
}

/// Percent-encode an id for use as a path segment.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
