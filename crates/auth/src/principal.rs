use serde::Serialize;

use backoffice_core::UserId;

use crate::{Permission, Role};

/// Identity of an authenticated user, as handed to protected handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

/// Principal plus the permission set of its role, loaded in one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub principal: Principal,
    pub permissions: Vec<Permission>,
}

impl ResolvedIdentity {
    pub fn role(&self) -> &Role {
        &self.principal.role
    }

    pub fn into_principal(self) -> Principal {
        self.principal
    }
}
