//! `backoffice-core` — shared identifiers and the domain error model.
//!
//! This crate has no infrastructure concerns.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{MenuId, RoleId, UserId};
