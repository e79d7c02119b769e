//! Products management route handlers.
//!
//! This module contains handlers for the products page, the table fragment,
//! and the create, update, and delete dialogs.

mod actions;
mod list;
pub mod types;

pub use types::{ProductRowView, ProductTableView};

// Re-export list handlers
pub use list::{ProductsIndexTemplate, ProductsTableTemplate, index, table};

// Re-export dialog handlers
pub use actions::{
    DeleteModalTemplate, ProductFormModalTemplate, create, delete, delete_dialog, edit_dialog,
    new_dialog, update,
};
