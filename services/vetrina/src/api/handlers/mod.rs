//! API handlers for the storefront.

pub mod auth;
pub mod health;
