//! Identity resolution: verified user id → principal, role, permissions.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use backoffice_core::{RoleId, UserId};

use crate::{Permission, Principal, ResolvedIdentity, Role};

/// Storage backend failure.
///
/// The message is for logs only; it never reaches an HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// A user row with its role eagerly loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub user_id: UserId,
    pub username: String,
    pub role: Option<RoleRecord>,
}

/// A role row with its granted permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// "Load user by id with role and permissions" as a single consistent read.
///
/// Implementations acquire whatever connection or transaction they need per
/// call and release it on every exit path, including the future being dropped.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn load_identity(&self, user_id: UserId) -> Result<Option<IdentityRecord>, StoreError>;
}

#[async_trait]
impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    async fn load_identity(&self, user_id: UserId) -> Result<Option<IdentityRecord>, StoreError> {
        (**self).load_identity(user_id).await
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("user not found")]
    NotFound,

    #[error("user has no role")]
    RoleMissing,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Loads the authenticated principal from an injected store.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, user_id: UserId) -> Result<ResolvedIdentity, ResolveError> {
        let record = self
            .store
            .load_identity(user_id)
            .await?
            .ok_or(ResolveError::NotFound)?;

        let role_record = record.role.ok_or(ResolveError::RoleMissing)?;
        let role = Role::new(role_record.id, role_record.name);

        Ok(ResolvedIdentity {
            principal: Principal {
                user_id: record.user_id,
                username: record.username,
                role,
            },
            permissions: role_record.permissions,
        })
    }
}
