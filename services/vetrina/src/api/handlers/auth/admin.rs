//! Admin-only endpoints, gated on the `admin` role.

use super::guard::require_auth;
use super::login::internal_error;
use super::state::AuthState;
use super::types::{ApiMessage, UsersResponse};
use crate::users::{Role, UserStore, UserView};
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
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 401, description = "Not authorized", body = ApiMessage),
        (status = 403, description = "Forbidden", body = ApiMessage),
    ),
    tag = "admin"
)]
pub async fn list_users(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    users: Extension<Arc<dyn UserStore>>,
) -> Response {
    let principal = match require_auth(&headers, &auth_state, users.as_ref()).await {
        Ok(principal) => principal,
        Err(rejection) => return rejection.into_response(),
    };
    if let Err(rejection) = principal.require_role(&[Role::Admin]) {
        return rejection.into_response();
    }

    let records = match users.list().await {
        Ok(records) => records,
        Err(err) => {
            error!("failed to list users: {err}");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(UsersResponse {
            success: true,
            users: records.iter().map(UserView::from).collect(),
        }),
    )
        .into_response()
}
