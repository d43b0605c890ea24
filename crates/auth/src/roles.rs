use serde::{Deserialize, Serialize};

use backoffice_core::RoleId;

/// Role name that bypasses fine-grained permission checks.
pub const SUPERUSER_ROLE: &str = "admin";

/// A principal's assigned role.
///
/// The superuser flag is derived from the name exactly once, at construction,
/// so check sites test a boolean instead of comparing strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: String,
    superuser: bool,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        let name = name.into();
        let superuser = name == SUPERUSER_ROLE;
        Self { id, name, superuser }
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_superuser(&self) -> bool {
        self.superuser
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
