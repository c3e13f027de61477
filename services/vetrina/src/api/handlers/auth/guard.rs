//! Session verification and role-based authorization.
//!
//! Flow overview: extract the bearer token (header first, `token` cookie as a
//! fallback), verify it against the signing secret, resolve the subject to an
//! active user, and hand downstream handlers a [`Principal`] with the
//! credential hash stripped. Every failure collapses to a generic 401 body;
//! the distinct cause is only ever logged.

use super::state::AuthState;
use super::types::ApiMessage;
use super::utils::now_unix_seconds;
use crate::users::{Role, UserStore, UserView};
use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use tracing::{debug, error};
use uuid::Uuid;

const TOKEN_COOKIE_NAME: &str = "token";

/// Rejection responses produced by the guards.
///
/// The three 401 variants deliberately share vague bodies so callers cannot
/// distinguish unknown users from bad tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRejection {
    TokenMissing,
    TokenInvalid,
    NotAuthorized,
    Forbidden,
}

impl AuthRejection {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TokenMissing | Self::TokenInvalid | Self::NotAuthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::TokenMissing => "Not authorized, token missing",
            Self::TokenInvalid => "Not authorized, token invalid",
            Self::NotAuthorized => "Not authorized",
            Self::Forbidden => "Forbidden",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiMessage::failure(self.message()))).into_response()
    }
}

/// Authenticated request context: the resolved user, hash stripped.
///
/// Request-scoped by construction; it is created per call to [`require_auth`]
/// and dropped with the handler.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user: UserView,
}

impl Principal {
    /// Permit the request iff the principal's role is in `allowed`.
    ///
    /// Pure check, no I/O.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` when the role is not in the allowed set.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AuthRejection> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            debug!(role = self.user.role.as_str(), "role not permitted");
            Err(AuthRejection::Forbidden)
        }
    }
}

/// Resolve the inbound request to an authenticated [`Principal`].
///
/// Read-only against the user store; the only side effect is logging.
///
/// # Errors
///
/// Returns a generic 401 rejection when the token is missing, fails
/// verification in any way, or does not resolve to an active user.
pub async fn require_auth(
    headers: &HeaderMap,
    auth_state: &AuthState,
    users: &dyn UserStore,
) -> Result<Principal, AuthRejection> {
    let Some(token) = extract_token(headers) else {
        return Err(AuthRejection::TokenMissing);
    };

    let secret = auth_state.config().token_secret().expose_secret();
    let claims = session_token::verify_hs256(&token, secret.as_bytes(), now_unix_seconds())
        .map_err(|err| {
            debug!("token verification failed: {err}");
            AuthRejection::TokenInvalid
        })?;

    // A subject that is not a valid id can only come from a foreign token
    // signed with our secret; treat it like any other invalid token.
    let subject = Uuid::parse_str(&claims.sub).map_err(|err| {
        debug!("token subject is not a valid user id: {err}");
        AuthRejection::TokenInvalid
    })?;

    let record = match users.find_by_id(subject).await {
        Ok(record) => record,
        Err(err) => {
            error!("failed to load user for session check: {err}");
            return Err(AuthRejection::NotAuthorized);
        }
    };

    match record {
        Some(record) if record.is_active => Ok(Principal {
            user: UserView::from(&record),
        }),
        Some(_) => {
            debug!(user_id = %subject, "session rejected: user inactive");
            Err(AuthRejection::NotAuthorized)
        }
        None => {
            debug!(user_id = %subject, "session rejected: unknown user");
            Err(AuthRejection::NotAuthorized)
        }
    }
}

/// Extract the candidate token: `Authorization: Bearer` first, then the
/// `token` cookie.
pub(crate) fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        // Segments without `=` are not ours to judge; skip them.
        let Some((key, val)) = pair.trim().split_once('=') else {
            continue;
        };
        let val = val.trim();
        if key.trim() == TOKEN_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
