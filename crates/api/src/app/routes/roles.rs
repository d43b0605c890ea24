use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::HeaderMap,
    routing::get,
};

use backoffice_auth::catalog;
use backoffice_core::RoleId;
use backoffice_infra::RoleSummary;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles))
        .route("/:id", get(get_role))
}

/// GET /roles
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoleSummary>>, ApiError> {
    authz::require_any(&services.gate, &headers, &[catalog::ROLES_READ]).await?;

    Ok(Json(services.directory.list_roles().await?))
}

/// GET /roles/:id
pub async fn get_role(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<RoleSummary>, ApiError> {
    authz::require_any(&services.gate, &headers, &[catalog::ROLES_READ]).await?;

    let id: RoleId = id.parse()?;
    let role = services
        .directory
        .find_role(id)
        .await?
        .ok_or(ApiError::NotFound("role"))?;
    Ok(Json(role))
}
