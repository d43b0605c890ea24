use axum::{Router, routing::get};

pub mod menus;
pub mod roles;
pub mod system;
pub mod users;

/// Router for all endpoints that go through the authorization gate.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/menus", menus::router())
}
