//! Permission evaluation.
//!
//! - No IO
//! - No panics
//! - Total: every input yields a boolean

use crate::{Permission, Role};

/// Does `role` with `permissions` grant `required`?
///
/// 1. A superuser role is authorized unconditionally. This is a bypass, not a
///    union with some implicit permission set: the role needs no permission rows.
/// 2. Otherwise `required` must match a granted permission exactly on both
///    resource and action.
pub fn authorize(role: &Role, permissions: &[Permission], required: &Permission) -> bool {
    if role.is_superuser() {
        return true;
    }

    permissions.iter().any(|p| p.matches(required))
}

/// Logical OR of [`authorize`] across the acceptable pairs for an endpoint.
///
/// An empty `acceptable` list authorizes only the superuser.
pub fn authorize_any(role: &Role, permissions: &[Permission], acceptable: &[Permission]) -> bool {
    if role.is_superuser() {
        return true;
    }

    acceptable
        .iter()
        .any(|required| authorize(role, permissions, required))
}
