//! Authentication and authorization for the storefront API.
//!
//! Login and registration issue signed session tokens; the guard module
//! verifies them and resolves the active user on every protected request.
//! Tokens are not individually revocable: invalidation is expiry or the
//! client discarding its copy.

pub mod admin;
pub mod guard;
pub mod login;
pub mod profile;
pub mod register;
mod state;
mod types;
mod utils;

#[cfg(test)]
mod tests;

pub use admin::list_users;
pub use guard::{AuthRejection, Principal, require_auth};
pub use login::login;
pub use profile::{me, update_profile};
pub use register::register;
pub use state::{AuthConfig, AuthState, DEV_TOKEN_SECRET, RegistrationPolicy};
pub use types::{
    ApiMessage, LoginRequest, ProfileRequest, RegisterRequest, SessionResponse, UserResponse,
    UsersResponse,
};
