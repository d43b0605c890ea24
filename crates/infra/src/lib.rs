//! Infrastructure layer: configuration and storage adapters.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{DirectoryStore, InMemoryStore, MenuSummary, PostgresStore, RoleSummary};
