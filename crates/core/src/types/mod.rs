//! Core types for Shelfdesk.
//!
//! This module provides type-safe wrappers for the product domain.

pub mod form;
pub mod id;
pub mod product;

pub use form::{FieldErrors, ProductDraft, ProductField, ProductForm};
pub use id::{ProductId, ProductIdError};
pub use product::Product;
