//! Service wiring: token validator, identity resolver and stores.

use std::sync::Arc;

use backoffice_auth::{AuthorizationGate, Hs256JwtValidator, IdentityResolver, IdentityStore, StoreError};
use backoffice_infra::{AppConfig, DirectoryStore, InMemoryStore, PostgresStore};

/// Everything a handler needs, shared behind one `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub gate: AuthorizationGate,
    pub directory: Arc<dyn DirectoryStore>,
}

impl AppServices {
    pub fn new(
        jwt_secret: impl AsRef<[u8]>,
        identities: Arc<dyn IdentityStore>,
        directory: Arc<dyn DirectoryStore>,
    ) -> Self {
        let validator = Arc::new(Hs256JwtValidator::new(jwt_secret));
        let gate = AuthorizationGate::new(validator, IdentityResolver::new(identities));
        Self { gate, directory }
    }

    /// Both ports served by one in-memory store.
    pub fn in_memory(jwt_secret: impl AsRef<[u8]>, store: Arc<InMemoryStore>) -> Self {
        Self::new(jwt_secret, store.clone(), store)
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise the seeded demo store.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    match &config.database_url {
        Some(url) => {
            let store = Arc::new(PostgresStore::connect(url, config.database_max_connections).await?);
            tracing::info!(max_connections = config.database_max_connections, "using postgres store");
            Ok(AppServices::new(&config.jwt_secret, store.clone(), store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory demo store");
            Ok(AppServices::in_memory(&config.jwt_secret, Arc::new(InMemoryStore::demo())))
        }
    }
}
