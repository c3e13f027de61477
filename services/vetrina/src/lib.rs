//! # Vetrina storefront API
//!
//! `vetrina` is the storefront backend: it authenticates shoppers, issues
//! signed session tokens, and guards protected routes.
//!
//! ## Sessions
//!
//! A session is an HS256-signed token carrying the user id and an expiry.
//! Tokens are immutable and not individually revocable; a session ends when
//! the token expires or the client discards it. Every protected request is
//! re-verified server side: the token signature and expiry are checked, then
//! the subject is resolved against the user store and must still be active.
//!
//! ## Authorization
//!
//! Roles (`customer`, `admin`) gate admin endpoints after authentication.
//! Authentication failures are uniform 401s with deliberately vague bodies;
//! role failures are 403s, since they imply a successful authentication.

pub mod api;
pub mod cli;
pub mod users;
