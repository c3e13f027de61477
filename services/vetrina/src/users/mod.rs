//! User records and the store seam.
//!
//! The storefront owns authentication, not user persistence: handlers and
//! guards only ever see the `UserStore` trait. The Postgres implementation
//! backs production; the in-memory implementation backs tests.

pub(crate) mod memory;
pub(crate) mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role, stored as lowercase text.
#[derive(ToSchema, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Full user row, including the credential hash.
///
/// Never serialized: everything that crosses the HTTP boundary goes through
/// [`UserView`].
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// User fields safe to return to clients (credential hash stripped).
#[derive(ToSchema, Clone, Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<&UserRecord> for UserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role,
            is_active: record.is_active,
        }
    }
}

/// Input for creating a user; the password is already hashed by the caller.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Profile fields a user may change; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub enum SignupOutcome {
    Created(UserRecord),
    Conflict,
}

/// Outcome when patching a user's profile.
#[derive(Debug)]
pub enum ProfileOutcome {
    Updated(UserRecord),
    /// The requested email already belongs to another account.
    EmailTaken,
    /// No user with that id.
    Missing,
}

/// Read/write seam over the persistent user store.
///
/// All reads performed by the session guard go through `find_by_id`; the
/// guard never mutates.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Lookup by normalized (trimmed, lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Insert a new user; reports a conflict when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<SignupOutcome>;

    /// Apply a profile patch. An email change onto an address another
    /// account holds reports `EmailTaken`, mirroring `insert`'s conflict.
    async fn update_profile(&self, id: Uuid, patch: ProfilePatch) -> Result<ProfileOutcome>;

    async fn list(&self) -> Result<Vec<UserRecord>>;
}
