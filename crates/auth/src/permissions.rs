use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Atomic capability: an action on a resource (e.g. `menus:read`).
///
/// Matching is exact on both halves. There are no wildcards and no hierarchy
/// between resources; the only blanket grant is the superuser role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    resource: Cow<'static, str>,
    action: Cow<'static, str>,
}

impl Permission {
    pub fn new(resource: impl Into<Cow<'static, str>>, action: impl Into<Cow<'static, str>>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Const constructor for the static catalog below.
    pub const fn from_static(resource: &'static str, action: &'static str) -> Self {
        Self {
            resource: Cow::Borrowed(resource),
            action: Cow::Borrowed(action),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Exact (resource, action) equality.
    pub fn matches(&self, other: &Permission) -> bool {
        self.resource() == other.resource() && self.action() == other.action()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid permission '{0}' (expected 'resource:action')")]
pub struct ParsePermissionError(String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((resource, action)) if !resource.is_empty() && !action.is_empty() => {
                Ok(Self::new(resource.to_string(), action.to_string()))
            }
            _ => Err(ParsePermissionError(s.to_string())),
        }
    }
}

/// Permissions referenced by the HTTP handlers.
pub mod catalog {
    use super::Permission;

    pub const USERS_READ: Permission = Permission::from_static("users", "read");
    pub const ROLES_READ: Permission = Permission::from_static("roles", "read");
    pub const ROLES_WRITE: Permission = Permission::from_static("roles", "write");
    pub const MENUS_READ: Permission = Permission::from_static("menus", "read");
}
