use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::HeaderMap, routing::get};
use serde_json::{Value, json};

use backoffice_auth::catalog;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new().route("/count", get(count))
}

/// GET /users/count
pub async fn count(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authz::require_any(&services.gate, &headers, &[catalog::USERS_READ]).await?;

    let count = services.directory.count_users().await?;
    Ok(Json(json!({ "count": count })))
}
