//! Postgres-backed store.
//!
//! Tables (provisioned outside this crate):
//!
//! - `users(id, username, role_id)`
//! - `roles(id, name)`
//! - `permissions(id, resource, action)`
//! - `role_permissions(role_id, permission_id)`
//! - `menus(id, name)`
//! - `role_menus(role_id, menu_id)`
//!
//! ## Connection scope
//!
//! Each call checks a connection out of the pool (or opens a transaction on
//! one) and hands it back when the call returns or its future is dropped.
//! An abandoned transaction is rolled back by sqlx.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::Instrument;

use backoffice_auth::{IdentityRecord, IdentityStore, Permission, RoleRecord, StoreError};
use backoffice_core::{MenuId, RoleId, UserId};

use super::{DirectoryStore, MenuSummary, RoleSummary};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(backend)?;
        Ok(Self::new(pool))
    }

    async fn load_identity_tx(&self, user_id: UserId) -> Result<Option<IdentityRecord>, StoreError> {
        // User, role and permissions come from one snapshot.
        let mut tx = self.pool.begin().await.map_err(backend)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, r.id AS role_id, r.name AS role_name
            FROM users u
            LEFT JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id.get())
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        let Some(row) = row else {
            tx.commit().await.map_err(backend)?;
            return Ok(None);
        };

        let username: String = row.try_get("username").map_err(backend)?;
        let role_id: Option<i32> = row.try_get("role_id").map_err(backend)?;
        let role_name: Option<String> = row.try_get("role_name").map_err(backend)?;

        let role = match (role_id, role_name) {
            (Some(id), Some(name)) => {
                let rows = sqlx::query(
                    r#"
                    SELECT p.resource, p.action
                    FROM role_permissions rp
                    JOIN permissions p ON p.id = rp.permission_id
                    WHERE rp.role_id = $1
                    ORDER BY p.id
                    "#,
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await
                .map_err(backend)?;

                let permissions = rows
                    .iter()
                    .map(permission_from_row)
                    .collect::<Result<Vec<_>, _>>()?;

                Some(RoleRecord {
                    id: RoleId::new(id),
                    name,
                    permissions,
                })
            }
            _ => None,
        };

        tx.commit().await.map_err(backend)?;

        Ok(Some(IdentityRecord {
            user_id,
            username,
            role,
        }))
    }

    async fn role_permissions(&self, role_id: Option<RoleId>) -> Result<BTreeMap<RoleId, Vec<Permission>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT rp.role_id, p.resource, p.action
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE $1::INT IS NULL OR rp.role_id = $1
            ORDER BY rp.role_id, p.id
            "#,
        )
        .bind(role_id.map(RoleId::get))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut grouped: BTreeMap<RoleId, Vec<Permission>> = BTreeMap::new();
        for row in rows {
            let role_id = RoleId::new(row.try_get("role_id").map_err(backend)?);
            grouped.entry(role_id).or_default().push(permission_from_row(&row)?);
        }
        Ok(grouped)
    }

    async fn menu_roles(&self, menu_id: Option<MenuId>) -> Result<BTreeMap<MenuId, Vec<RoleId>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT menu_id, role_id
            FROM role_menus
            WHERE $1::INT IS NULL OR menu_id = $1
            ORDER BY menu_id, role_id
            "#,
        )
        .bind(menu_id.map(MenuId::get))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut grouped: BTreeMap<MenuId, Vec<RoleId>> = BTreeMap::new();
        for row in rows {
            let menu_id = MenuId::new(row.try_get("menu_id").map_err(backend)?);
            let role_id = RoleId::new(row.try_get("role_id").map_err(backend)?);
            grouped.entry(menu_id).or_default().push(role_id);
        }
        Ok(grouped)
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::backend(e.to_string())
}

fn permission_from_row(row: &PgRow) -> Result<Permission, StoreError> {
    let resource: String = row.try_get("resource").map_err(backend)?;
    let action: String = row.try_get("action").map_err(backend)?;
    Ok(Permission::new(resource, action))
}

#[async_trait]
impl IdentityStore for PostgresStore {
    async fn load_identity(&self, user_id: UserId) -> Result<Option<IdentityRecord>, StoreError> {
        self.load_identity_tx(user_id)
            .instrument(tracing::debug_span!("load_identity", %user_id))
            .await
    }
}

#[async_trait]
impl DirectoryStore for PostgresStore {
    async fn count_users(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        let count: i64 = row.try_get("count").map_err(backend)?;
        Ok(count.max(0) as u64)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        let mut permissions = self.role_permissions(None).await?;

        rows.iter()
            .map(|row| -> Result<RoleSummary, StoreError> {
                let id = RoleId::new(row.try_get("id").map_err(backend)?);
                Ok(RoleSummary {
                    id,
                    name: row.try_get("name").map_err(backend)?,
                    permissions: permissions.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn find_role(&self, id: RoleId) -> Result<Option<RoleSummary>, StoreError> {
        let row = sqlx::query("SELECT name FROM roles WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut permissions = self.role_permissions(Some(id)).await?;
        Ok(Some(RoleSummary {
            id,
            name: row.try_get("name").map_err(backend)?,
            permissions: permissions.remove(&id).unwrap_or_default(),
        }))
    }

    async fn list_menus(&self) -> Result<Vec<MenuSummary>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM menus ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        let mut role_ids = self.menu_roles(None).await?;

        rows.iter()
            .map(|row| -> Result<MenuSummary, StoreError> {
                let id = MenuId::new(row.try_get("id").map_err(backend)?);
                Ok(MenuSummary {
                    id,
                    name: row.try_get("name").map_err(backend)?,
                    role_ids: role_ids.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn find_menu(&self, id: MenuId) -> Result<Option<MenuSummary>, StoreError> {
        let row = sqlx::query("SELECT name FROM menus WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut role_ids = self.menu_roles(Some(id)).await?;
        Ok(Some(MenuSummary {
            id,
            name: row.try_get("name").map_err(backend)?,
            role_ids: role_ids.remove(&id).unwrap_or_default(),
        }))
    }
}
