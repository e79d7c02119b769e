//! Shelfdesk Core - Shared product types.
//!
//! This crate provides the types used by the Shelfdesk admin screen:
//! - `admin` - The product admin panel (server-rendered, talks to the backend API)
//! - `integration-tests` - Black-box tests against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. The product lifecycle is owned by the backend API; these types
//! only describe what the backend sends and what the admin forms submit.
//!
//! # Modules
//!
//! - [`types`] - Product record, product ID newtype, and the product form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
