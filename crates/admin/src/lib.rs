//! Shelfdesk Admin library.
//!
//! This crate provides the product admin screen as a library,
//! allowing it to be tested and reused.
//!
//! The screen is presentation glue over a remote product API: it renders the
//! products table and the create, update, and delete dialogs, forwards
//! submissions to the backend, and reports the outcome as toasts.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::router;
pub use state::AppState;

#[cfg(test)]
mod test_support;
