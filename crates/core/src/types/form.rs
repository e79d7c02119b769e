//! Product form input and validation.
//!
//! The create and update dialogs submit the same four fields as raw text.
//! [`ProductForm::validate`] turns them into a typed [`ProductDraft`] or
//! reports one message per failing field.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Minimum length (in characters) of the name and description fields.
pub const MIN_TEXT_LENGTH: usize = 2;

/// Form fields of the product dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Stock,
}

impl ProductField {
    /// Form field name as used in HTML `name` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }

    /// Validation message shown under the field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Name => "Product name must be at least 2 characters.",
            Self::Description => "Product description must be at least 2 characters.",
            Self::Price => "Price must be a valid number.",
            Self::Stock => "Stock must be a valid number.",
        }
    }
}

/// Validation failures keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} invalid field(s)", .0.len())]
pub struct FieldErrors(BTreeMap<ProductField, String>);

impl FieldErrors {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. The first message recorded for a field wins.
    pub fn add(&mut self, field: ProductField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: ProductField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Raw product form as submitted by the create/update dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
}

/// Validated product fields, ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
}

impl ProductForm {
    /// Prefill the form from an existing product (update dialog).
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.normalize().to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] with one message per failing field:
    /// - name/description shorter than 2 characters after trimming
    /// - price that is not a number or is below 1
    /// - stock that is not a whole number or is below 1
    pub fn validate(&self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.chars().count() < MIN_TEXT_LENGTH {
            errors.add(ProductField::Name, ProductField::Name.message());
        }

        let description = self.description.trim();
        if description.chars().count() < MIN_TEXT_LENGTH {
            errors.add(ProductField::Description, ProductField::Description.message());
        }

        let price = Decimal::from_str(self.price.trim())
            .ok()
            .filter(|p| *p >= Decimal::ONE);
        if price.is_none() {
            errors.add(ProductField::Price, ProductField::Price.message());
        }

        let stock = self.stock.trim().parse::<i64>().ok().filter(|s| *s >= 1);
        if stock.is_none() {
            errors.add(ProductField::Stock, ProductField::Stock.message());
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok(ProductDraft {
                name: name.to_owned(),
                description: description.to_owned(),
                price,
                stock,
            }),
            _ => Err(errors),
        }
    }
}
