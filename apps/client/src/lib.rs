//! Client library for the Vetrina storefront API.
//!
//! Wraps the auth endpoints in a session manager that keeps the signed-in
//! user and token mirrored between memory and a durable store, so a restart
//! resumes the previous session without another login.

pub mod api;
pub mod config;
pub mod errors;
pub mod session;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use errors::{ClientError, StoreError};
pub use session::manager::{AuthSession, RegisterOutcome, SessionState};
pub use session::store::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};
pub use session::types::{ProfileRequest, UserResponse, UserView};
