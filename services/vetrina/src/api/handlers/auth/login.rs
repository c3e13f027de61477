//! Login endpoint: credential check plus token issuance.

use super::state::AuthState;
use super::types::{ApiMessage, LoginRequest, SessionResponse};
use super::utils::{normalize_email, now_unix_seconds, verify_password};
use crate::users::{UserStore, UserView};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, error};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = ApiMessage),
    ),
    tag = "auth"
)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::failure("Missing payload")),
        )
            .into_response();
    };

    let email = normalize_email(&request.email);
    let record = match users.find_by_email(&email).await {
        Ok(record) => record,
        Err(err) => {
            error!("failed to lookup user for login: {err}");
            return internal_error();
        }
    };

    // One rejection for every credential failure so responses carry no
    // account-enumeration signal.
    let Some(record) = record else {
        debug!("login rejected: unknown email");
        return invalid_credentials();
    };
    if !record.is_active {
        debug!(user_id = %record.id, "login rejected: user inactive");
        return invalid_credentials();
    }
    if !verify_password(&request.password, &record.password_hash) {
        debug!(user_id = %record.id, "login rejected: bad password");
        return invalid_credentials();
    }

    let config = auth_state.config();
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
        StatusCode::OK,
        Json(SessionResponse {
            success: true,
            token,
            user: UserView::from(&record),
        }),
    )
        .into_response()
}

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiMessage::failure("Invalid credentials")),
    )
        .into_response()
}

pub(super) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiMessage::failure("Internal server error")),
    )
        .into_response()
}
