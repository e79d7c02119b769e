//! Admin services that sit between the route handlers and the product API.

pub mod listing;
pub mod pending;
