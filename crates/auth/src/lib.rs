//! `backoffice-auth` — the authentication/authorization gate.
//!
//! Token verification, identity resolution and permission evaluation, composed
//! by [`AuthorizationGate`]. Decoupled from HTTP; storage is an injected port.

pub mod authorize;
pub mod claims;
pub mod gate;
pub mod permissions;
pub mod principal;
pub mod resolver;
pub mod roles;
pub mod token;

pub use authorize::{authorize, authorize_any};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use gate::{AuthorizationGate, GateError, bearer_token};
pub use permissions::{Permission, catalog};
pub use principal::{Principal, ResolvedIdentity};
pub use resolver::{IdentityRecord, IdentityResolver, IdentityStore, ResolveError, RoleRecord, StoreError};
pub use roles::{Role, SUPERUSER_ROLE};
pub use token::{Hs256JwtValidator, JwtValidator, TokenError};
