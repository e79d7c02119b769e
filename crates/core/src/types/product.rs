//! Product record as served by the backend API.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;

/// A product as returned by `GET /api/v1/product-list`.
///
/// The backend owns the lifecycle; the admin only mirrors what the last
/// response contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description; missing or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Unit price, a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units in stock.
    pub stock: i64,
}

impl Product {
    /// Format the price for display (e.g., "$19.90").
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price.round_dp(2))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
