use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::HeaderMap,
    routing::get,
};
use serde_json::{Value, json};

use backoffice_auth::catalog;
use backoffice_core::MenuId;
use backoffice_infra::MenuSummary;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_menus))
        .route("/:id/roles", get(menu_roles))
}

/// GET /menus
pub async fn list_menus(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<Vec<MenuSummary>>, ApiError> {
    authz::require_any(&services.gate, &headers, &[catalog::MENUS_READ]).await?;

    Ok(Json(services.directory.list_menus().await?))
}

/// GET /menus/:id/roles
///
/// Readable with either `menus:read` or `roles:read`.
pub async fn menu_roles(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authz::require_any(
        &services.gate,
        &headers,
        &[catalog::MENUS_READ, catalog::ROLES_READ],
    )
    .await?;

    let id: MenuId = id.parse()?;
    let menu = services
        .directory
        .find_menu(id)
        .await?
        .ok_or(ApiError::NotFound("menu"))?;

    Ok(Json(json!({
        "menu": { "id": menu.id, "name": menu.name },
        "roleIds": menu.role_ids,
    })))
}
