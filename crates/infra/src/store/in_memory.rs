use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use backoffice_auth::{IdentityRecord, IdentityStore, Permission, RoleRecord, StoreError, catalog};
use backoffice_core::{MenuId, RoleId, UserId};

use super::{DirectoryStore, MenuSummary, RoleSummary};

#[derive(Debug, Clone)]
struct UserRow {
    username: String,
    role_id: Option<RoleId>,
}

#[derive(Debug, Clone)]
struct RoleRow {
    name: String,
    permissions: Vec<Permission>,
}

#[derive(Debug, Clone)]
struct MenuRow {
    name: String,
    role_ids: Vec<RoleId>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserRow>,
    roles: BTreeMap<RoleId, RoleRow>,
    menus: BTreeMap<MenuId, MenuRow>,
}

impl Tables {
    fn insert_role(&mut self, id: RoleId, name: impl Into<String>, permissions: Vec<Permission>) {
        self.roles.insert(
            id,
            RoleRow {
                name: name.into(),
                permissions,
            },
        );
    }

    fn insert_user(&mut self, id: UserId, username: impl Into<String>, role_id: Option<RoleId>) {
        self.users.insert(
            id,
            UserRow {
                username: username.into(),
                role_id,
            },
        );
    }

    fn insert_menu(&mut self, id: MenuId, name: impl Into<String>, role_ids: Vec<RoleId>) {
        self.menus.insert(
            id,
            MenuRow {
                name: name.into(),
                role_ids,
            },
        );
    }
}

fn role_summary(id: RoleId, row: &RoleRow) -> RoleSummary {
    RoleSummary {
        id,
        name: row.name.clone(),
        permissions: row.permissions.clone(),
    }
}

fn menu_summary(id: MenuId, row: &MenuRow) -> MenuSummary {
    MenuSummary {
        id,
        name: row.name.clone(),
        role_ids: row.role_ids.clone(),
    }
}

/// In-memory store for tests/dev.
///
/// Every read takes one read lock, so an identity load never observes a role
/// swap halfway through.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed data for running without a database.
    ///
    /// - `admin` (role 1): no permission rows, superuser
    /// - `editor` (role 2): `menus:read`
    /// - `viewer` (role 3): `users:read`
    pub fn demo() -> Self {
        let mut t = Tables::default();
        t.insert_role(RoleId::new(1), "admin", vec![]);
        t.insert_role(RoleId::new(2), "editor", vec![catalog::MENUS_READ]);
        t.insert_role(RoleId::new(3), "viewer", vec![catalog::USERS_READ]);

        t.insert_user(UserId::new(1), "admin", Some(RoleId::new(1)));
        t.insert_user(UserId::new(2), "editor", Some(RoleId::new(2)));
        t.insert_user(UserId::new(3), "viewer", Some(RoleId::new(3)));

        t.insert_menu(MenuId::new(1), "Dashboard", vec![RoleId::new(1), RoleId::new(2), RoleId::new(3)]);
        t.insert_menu(MenuId::new(2), "Users", vec![RoleId::new(1), RoleId::new(3)]);
        t.insert_menu(MenuId::new(3), "Roles", vec![RoleId::new(1)]);
        t.insert_menu(MenuId::new(4), "Menus", vec![RoleId::new(1), RoleId::new(2)]);

        Self { inner: RwLock::new(t) }
    }

    pub fn insert_role(
        &self,
        id: RoleId,
        name: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Result<(), StoreError> {
        self.write()?.insert_role(id, name, permissions);
        Ok(())
    }

    pub fn insert_user(
        &self,
        id: UserId,
        username: impl Into<String>,
        role_id: Option<RoleId>,
    ) -> Result<(), StoreError> {
        self.write()?.insert_user(id, username, role_id);
        Ok(())
    }

    pub fn insert_menu(&self, id: MenuId, name: impl Into<String>, role_ids: Vec<RoleId>) -> Result<(), StoreError> {
        self.write()?.insert_menu(id, name, role_ids);
        Ok(())
    }

    /// Returns whether the user existed.
    pub fn remove_user(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.write()?.users.remove(&id).is_some())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::backend("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn load_identity(&self, user_id: UserId) -> Result<Option<IdentityRecord>, StoreError> {
        let t = self.read()?;
        let Some(user) = t.users.get(&user_id) else {
            return Ok(None);
        };

        // A dangling role id reads as "no role", like a LEFT JOIN would.
        let role = user.role_id.and_then(|role_id| {
            t.roles.get(&role_id).map(|row| RoleRecord {
                id: role_id,
                name: row.name.clone(),
                permissions: row.permissions.clone(),
            })
        });

        Ok(Some(IdentityRecord {
            user_id,
            username: user.username.clone(),
            role,
        }))
    }
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.users.len() as u64)
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, StoreError> {
        let t = self.read()?;
        Ok(t.roles
            .iter()
            .map(|(id, row)| role_summary(*id, row))
            .collect())
    }

    async fn find_role(&self, id: RoleId) -> Result<Option<RoleSummary>, StoreError> {
        let t = self.read()?;
        Ok(t.roles.get(&id).map(|row| role_summary(id, row)))
    }

    async fn list_menus(&self) -> Result<Vec<MenuSummary>, StoreError> {
        let t = self.read()?;
        Ok(t.menus
            .iter()
            .map(|(id, row)| menu_summary(*id, row))
            .collect())
    }

    async fn find_menu(&self, id: MenuId) -> Result<Option<MenuSummary>, StoreError> {
        let t = self.read()?;
        Ok(t.menus.get(&id).map(|row| menu_summary(id, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_identity_with_role_and_permissions() {
        let store = InMemoryStore::demo();
        let record = store.load_identity(UserId::new(2)).await.unwrap().unwrap();
        assert_eq!(record.username, "editor");

        let role = record.role.unwrap();
        assert_eq!(role.name, "editor");
        assert_eq!(role.permissions, vec![catalog::MENUS_READ]);
    }

    #[tokio::test]
    async fn missing_user_loads_none() {
        let store = InMemoryStore::demo();
        assert!(store.load_identity(UserId::new(99)).await.unwrap().is_none());

        assert!(store.remove_user(UserId::new(2)).unwrap());
        assert!(store.load_identity(UserId::new(2)).await.unwrap().is_none());
        assert!(!store.remove_user(UserId::new(2)).unwrap());
    }

    #[tokio::test]
    async fn dangling_role_reads_as_no_role() {
        let store = InMemoryStore::new();
        store.insert_user(UserId::new(1), "ghost", Some(RoleId::new(42))).unwrap();
        let record = store.load_identity(UserId::new(1)).await.unwrap().unwrap();
        assert!(record.role.is_none());
    }

    #[tokio::test]
    async fn directory_queries() {
        let store = InMemoryStore::demo();
        assert_eq!(store.count_users().await.unwrap(), 3);

        let roles = store.list_roles().await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["admin", "editor", "viewer"]);

        let menu = store.find_menu(MenuId::new(4)).await.unwrap().unwrap();
        assert_eq!(menu.name, "Menus");
        assert_eq!(menu.role_ids, vec![RoleId::new(1), RoleId::new(2)]);
        assert!(store.find_menu(MenuId::new(40)).await.unwrap().is_none());

        assert!(store.find_role(RoleId::new(3)).await.unwrap().is_some());
        assert!(store.find_role(RoleId::new(30)).await.unwrap().is_none());
        assert_eq!(store.list_menus().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn poisoned_lock_surfaces_as_store_error() {
        let store = std::sync::Arc::new(InMemoryStore::demo());
        let writer = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(
            store.insert_user(UserId::new(9), "late", Some(RoleId::new(1))),
            Err(StoreError::Backend(_))
        ));
        assert!(store.insert_role(RoleId::new(9), "late", vec![]).is_err());
        assert!(store.insert_menu(MenuId::new(9), "Late", vec![]).is_err());
        assert!(store.remove_user(UserId::new(1)).is_err());
        assert!(store.load_identity(UserId::new(1)).await.is_err());
    }

    #[test]
    fn menu_summary_serializes_role_ids_in_camel_case() {
        let summary = MenuSummary {
            id: MenuId::new(1),
            name: "Dashboard".to_string(),
            role_ids: vec![RoleId::new(1)],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 1, "name": "Dashboard", "roleIds": [1] }));
    }
}
