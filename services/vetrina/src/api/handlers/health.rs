use crate::users::UserStore;
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    name: String,
    version: String,
    user_store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "User store is reachable", body = Health),
        (status = 503, description = "User store is unreachable", body = Health),
    ),
    tag = "health"
)]
pub async fn health(users: Extension<Arc<dyn UserStore>>) -> Response {
    // Cheap store probe: the nil id never matches a row, so this only checks
    // that the store answers.
    let store_ok = match users.find_by_id(Uuid::nil()).await {
        Ok(_) => true,
        Err(err) => {
            error!("health check failed to reach user store: {err}");
            false
        }
    };

    let health = Health {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        user_store: if store_ok { "ok" } else { "error" }.to_string(),
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health)).into_response()
}
