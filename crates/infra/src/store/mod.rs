//! Storage adapters.
//!
//! Both adapters implement the gate's [`IdentityStore`] port and the
//! handler-facing [`DirectoryStore`].
//!
//! [`IdentityStore`]: backoffice_auth::IdentityStore

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use backoffice_auth::{Permission, StoreError};
use backoffice_core::{MenuId, RoleId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Role with its granted permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// Menu entry with the ids of the roles allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSummary {
    pub id: MenuId,
    pub name: String,
    pub role_ids: Vec<RoleId>,
}

/// Read queries used by the protected handlers.
///
/// Listings are ordered by id.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn count_users(&self) -> Result<u64, StoreError>;
    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError>;
    async fn find_role(&self, id: RoleId) -> Result<Option<RoleSummary>, StoreError>;
    async fn list_menus(&self) -> Result<Vec<MenuSummary>, StoreError>;
    async fn find_menu(&self, id: MenuId) -> Result<Option<MenuSummary>, StoreError>;
}

#[async_trait]
impl<S> DirectoryStore for Arc<S>
where
    S: DirectoryStore + ?Sized,
{
    async fn count_users(&self) -> Result<u64, StoreError> {
        (**self).count_users().await
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        (**self).list_roles().await
    }

    async fn find_role(&self, id: RoleId) -> Result<Option<RoleSummary>, StoreError> {
        (**self).find_role(id).await
    }

    async fn list_menus(&self) -> Result<Vec<MenuSummary>, StoreError> {
        (**self).list_menus().await
    }

    async fn find_menu(&self, id: MenuId) -> Result<Option<MenuSummary>, StoreError> {
        (**self).find_menu(id).await
    }
}
