//! Request and response bodies of the product backend.

use serde::{Deserialize, Serialize};
use shelfdesk_core::{Product, ProductDraft, ProductId};

/// `GET /api/v1/product-list` response.
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    /// Products; a missing or `null` list is treated as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Product>,
}

/// Response of every mutation endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome, shown as the success toast.
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/v1/product-update` body.
#[derive(Debug, Serialize)]
pub struct UpdateProductRequest<'a> {
    pub id: &'a ProductId,
    #[serde(flatten)]
    pub fields: &'a ProductDraft,
}

/// `POST /api/v1/product-hard-delete` body.
#[derive(Debug, Serialize)]
pub struct DeleteProductRequest<'a> {
    pub id: &'a ProductId,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Product>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Product>>::deserialize(deserializer)?.unwrap_or_default())
}
