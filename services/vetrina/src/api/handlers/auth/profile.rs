//! Profile endpoints for the authenticated user.

use super::guard::require_auth;
use super::login::internal_error;
use super::state::AuthState;
use super::types::{ApiMessage, ProfileRequest, UserResponse};
use super::utils::{normalize_email, valid_email};
use crate::users::{ProfileOutcome, ProfilePatch, UserStore, UserView};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authorized", body = ApiMessage),
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
) -> Response {
    let principal = match require_auth(&headers, &auth_state, users.as_ref()).await {
        Ok(principal) => principal,
        Err(rejection) => return rejection.into_response(),
    };

    (
        StatusCode::OK,
        Json(UserResponse {
            success: true,
            user: principal.user,
        }),
    )
        .into_response()
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid profile payload", body = ApiMessage),
        (status = 401, description = "Not authorized", body = ApiMessage),
        (status = 409, description = "Email already registered", body = ApiMessage),
    ),
    tag = "auth"
)]
pub async fn update_profile(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<ProfileRequest>>,
) -> Response {
    let principal = match require_auth(&headers, &auth_state, users.as_ref()).await {
        Ok(principal) => principal,
        Err(rejection) => return rejection.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::failure("Missing payload")),
        )
            .into_response();
    };

    let email = request.email.map(|email| normalize_email(&email));
    if let Some(email) = &email {
        if !valid_email(email) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiMessage::failure("Invalid email address")),
            )
                .into_response();
        }
    }

    let patch = ProfilePatch {
        name: request.name.map(|name| name.trim().to_string()),
        email,
    };

    let outcome = match users.update_profile(principal.user.id, patch).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("failed to update profile: {err}");
            return internal_error();
        }
    };

    match outcome {
        ProfileOutcome::Updated(record) => (
            StatusCode::OK,
            Json(UserResponse {
                success: true,
                user: UserView::from(&record),
            }),
        )
            .into_response(),
        ProfileOutcome::EmailTaken => (
            StatusCode::CONFLICT,
            Json(ApiMessage::failure("Email already registered")),
        )
            .into_response(),
        // The principal was loaded a moment ago; a missing row here means the
        // account vanished mid-request.
        ProfileOutcome::Missing => (
            StatusCode::UNAUTHORIZED,
            Json(ApiMessage::failure("Not authorized")),
        )
            .into_response(),
    }
}
