//! Registration endpoint.
//!
//! Whether a successful registration also establishes a session is a
//! deployment policy (`RegistrationPolicy`), not a hard-coded behavior.

use super::login::internal_error;
use super::state::{AuthState, RegistrationPolicy};
use super::types::{ApiMessage, RegisterRequest, SessionResponse};
use super::utils::{hash_password, normalize_email, now_unix_seconds, valid_email};
use crate::users::{NewUser, Role, SignupOutcome, UserStore, UserView};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::error;

const MIN_PASSWORD_LENGTH: usize = 8;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = SessionResponse),
        (status = 400, description = "Invalid registration payload", body = ApiMessage),
        (status = 409, description = "Email already registered", body = ApiMessage),
    ),
    tag = "auth"
)]
pub async fn register(
    auth_state: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return bad_request("Invalid email address");
    }
    let name = request.name.trim();
    if name.is_empty() {
        return bad_request("Name is required");
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return bad_request("Password must be at least 8 characters");
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("failed to hash password: {err}");
            return internal_error();
        }
    };

    let outcome = users
        .insert(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            role: Role::Customer,
        })
        .await;

    let record = match outcome {
        Ok(SignupOutcome::Created(record)) => record,
        Ok(SignupOutcome::Conflict) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiMessage::failure("Email already registered")),
            )
                .into_response();
        }
        Err(err) => {
            error!("failed to insert user: {err}");
            return internal_error();
        }
    };

    let config = auth_state.config();
    match config.registration_policy() {
        RegistrationPolicy::RequireVerification => (
            StatusCode::CREATED,
            Json(ApiMessage::ok("Registration accepted, verification required")),
        )
            .into_response(),
        RegistrationPolicy::AutoSession => {
            let token = match session_token::issue_hs256(
                config.token_secret().expose_secret().as_bytes(),
                &record.id.to_string(),
                config.token_ttl_seconds(),
                now_unix_seconds(),
            ) {
                Ok(token) => token,
                Err(err) => {
                    error!("failed to issue session token: {err}");
                    return internal_error();
                }
            };
            (
                StatusCode::CREATED,
                Json(SessionResponse {
                    success: true,
                    token,
                    user: UserView::from(&record),
                }),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiMessage::failure(message))).into_response()
}
