use std::sync::Arc;

use axum::{Json, extract::Extension, http::HeaderMap, http::StatusCode};
use serde_json::{Value, json};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The caller's own identity; needs a valid token, no permission.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = authz::require_identity(&services.gate, &headers).await?;
    let role = identity.role();

    Ok(Json(json!({
        "id": identity.principal.user_id,
        "username": identity.principal.username,
        "role": { "id": role.id(), "name": role.name() },
        "superuser": role.is_superuser(),
        "permissions": identity.permissions.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })))
}
