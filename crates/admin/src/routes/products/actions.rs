//! Create, update, and delete dialogs and their submissions.
//!
//! Submissions answer in a shape the page's HTMX config understands:
//!
//! - `200` with an empty body: the dialog slot is cleared (dialog closes) and
//!   `HX-Trigger` shows a success toast and refreshes the table.
//! - `422` with the dialog re-rendered: field messages next to the inputs.
//! - `404`/`409`/`502`: nothing is swapped (dialog stays open) and
//!   `HX-Trigger` shows the toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelfdesk_core::{FieldErrors, ProductDraft, ProductForm, ProductId};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    api::ProductApiError,
    components::{HxTrigger, Toast},
    error::AppError,
    services::pending::MutationKey,
    state::AppState,
};

use super::types::{DeleteDialogView, FormMode, ProductFormInput, ProductFormView};

const CREATE_FAILED: &str = "Failed to create product!";
const UPDATE_FAILED: &str = "Failed to update product!";
const DELETE_FAILED: &str = "Failed to delete product!";
const ALREADY_SAVING: &str = "This product is already being saved.";

const CREATED: &str = "Product created successfully.";
const UPDATED: &str = "Product updated successfully.";
const DELETED: &str = "Product deleted successfully.";

/// Create/update dialog template.
#[derive(Template, WebTemplate)]
#[template(path = "products/_form_modal.html")]
pub struct ProductFormModalTemplate {
    pub form: ProductFormView,
}

/// Delete confirmation dialog template.
#[derive(Template, WebTemplate)]
#[template(path = "products/_delete_modal.html")]
pub struct DeleteModalTemplate {
    pub dialog: DeleteDialogView,
}

// =============================================================================
// Create
// =============================================================================

/// Open an empty create dialog.
#[instrument]
pub async fn new_dialog() -> ProductFormModalTemplate {
    ProductFormModalTemplate {
        form: ProductFormView::new(
            &FormMode::Create {
                form_token: Uuid::new_v4(),
            },
            &ProductForm::default(),
            &FieldErrors::new(),
        ),
    }
}

/// Create a product (HTMX handler).
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create(State(state): State<AppState>, Form(input): Form<ProductFormInput>) -> Response {
    let form_token = input.form_token();
    let form = input.form();
    let mode = FormMode::Create { form_token };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return invalid(&mode, &form, &errors),
    };

    let Some(_guard) = state.pending().try_begin(MutationKey::Create(form_token)) else {
        return busy();
    };

    match state.api().create_product(&draft).await {
        Ok(message) => {
            tracing::info!(name = %draft.name, "Product created");
            saved(message, CREATED)
        }
        Err(e) => failed(&e, CREATE_FAILED),
    }
}

// =============================================================================
// Update
// =============================================================================

/// Open the update dialog, prefilled from the product list.
#[instrument(skip(state))]
pub async fn edit_dialog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormModalTemplate, AppError> {
    let id = parse_id(&id)?;
    let product = state
        .api()
        .find_product(&id)
        .await
        .map_err(AppError::from_lookup)?;

    Ok(ProductFormModalTemplate {
        form: ProductFormView::new(
            &FormMode::Update {
                product_id: product.id.to_string(),
            },
            &ProductForm::from_product(&product),
            &FieldErrors::new(),
        ),
    })
}

/// Update a product (HTMX handler).
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<ProductFormInput>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let form = input.form();
    let mode = FormMode::Update {
        product_id: id.to_string(),
    };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return Ok(invalid(&mode, &form, &errors)),
    };

    let Some(_guard) = state.pending().try_begin(MutationKey::Product(id.clone())) else {
        return Ok(busy());
    };

    Ok(submit_update(&state, &id, &draft).await)
}

async fn submit_update(state: &AppState, id: &ProductId, draft: &ProductDraft) -> Response {
    // The listed id keeps the backend's JSON type (number or string)
    let product = match state.api().find_product(id).await {
        Ok(product) => product,
        Err(e) => return failed(&e, UPDATE_FAILED),
    };

    match state.api().update_product(&product.id, draft).await {
        Ok(message) => {
            tracing::info!(product_id = %product.id, "Product updated");
            saved(message, UPDATED)
        }
        Err(e) => failed(&e, UPDATE_FAILED),
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Open the delete confirmation dialog.
#[instrument(skip(state))]
pub async fn delete_dialog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<DeleteModalTemplate, AppError> {
    let id = parse_id(&id)?;
    let product = state
        .api()
        .find_product(&id)
        .await
        .map_err(AppError::from_lookup)?;

    Ok(DeleteModalTemplate {
        dialog: DeleteDialogView::from(&product),
    })
}

/// Permanently delete a product (HTMX handler).
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    let Some(_guard) = state.pending().try_begin(MutationKey::Product(id.clone())) else {
        return Ok(busy());
    };

    let product = match state.api().find_product(&id).await {
        Ok(product) => product,
        Err(e) => return Ok(failed(&e, DELETE_FAILED)),
    };

    Ok(match state.api().delete_product(&product.id).await {
        Ok(message) => {
            tracing::info!(product_id = %product.id, "Product deleted");
            saved(message, DELETED)
        }
        Err(e) => failed(&e, DELETE_FAILED),
    })
}

// =============================================================================
// Responses
// =============================================================================

fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid product id: {e}")))
}

/// Mutation succeeded: close the dialog, toast, refresh the table.
fn saved(message: Option<String>, fallback: &str) -> Response {
    let message = message.unwrap_or_else(|| fallback.to_string());
    (
        StatusCode::OK,
        HxTrigger::toast(Toast::success(message)).products_changed(),
        "",
    )
        .into_response()
}

/// Field validation failed: re-render the dialog in place.
fn invalid(mode: &FormMode, form: &ProductForm, errors: &FieldErrors) -> Response {
    tracing::debug!(errors = %errors.len(), "Product form rejected");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        ProductFormModalTemplate {
            form: ProductFormView::new(mode, form, errors),
        },
    )
        .into_response()
}

/// The same dialog is already waiting on the backend.
fn busy() -> Response {
    (
        StatusCode::CONFLICT,
        HxTrigger::toast(Toast::warning(ALREADY_SAVING)),
        "",
    )
        .into_response()
}

/// Backend call failed: keep the dialog open and show `toast`.
fn failed(err: &ProductApiError, toast: &str) -> Response {
    if err.is_not_found() {
        tracing::warn!(error = %err, "Product no longer exists");
        // The table is stale, so refresh it along with the toast
        return (
            StatusCode::NOT_FOUND,
            HxTrigger::toast(Toast::error(toast)).products_changed(),
            "",
        )
            .into_response();
    }

    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Product mutation failed"
    );
    (
        StatusCode::BAD_GATEWAY,
        HxTrigger::toast(Toast::error(toast)),
        "",
    )
        .into_response()
}
