//! Reusable UI building blocks shared by the admin pages.

pub mod data_table;
pub mod toast;

pub use data_table::{DataTableConfig, TableColumn, products_table_config};
pub use toast::{HxTrigger, PRODUCTS_CHANGED_EVENT, Toast, ToastLevel};
