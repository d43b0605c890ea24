//! The authorization gate every protected handler calls before doing work.
//!
//! Linear, no retries, fail-closed:
//! 1. absent/blank bearer header → `Unauthenticated` (no storage access)
//! 2. token rejected → `Unauthenticated`
//! 3. identity unresolvable → `Unauthenticated`
//! 4. no acceptable pair authorized → `Forbidden`
//! 5. otherwise the resolved `Principal`

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::resolver::{IdentityResolver, ResolveError};
use crate::token::JwtValidator;
use crate::{Permission, Principal, ResolvedIdentity, authorize_any};

/// Gate verdict on failure.
///
/// Deliberately coarse: which check failed is logged, never returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,
}

#[derive(Clone)]
pub struct AuthorizationGate {
    validator: Arc<dyn JwtValidator>,
    resolver: IdentityResolver,
}

impl AuthorizationGate {
    pub fn new(validator: Arc<dyn JwtValidator>, resolver: IdentityResolver) -> Self {
        Self { validator, resolver }
    }

    /// Authenticate the request and require one of `acceptable`.
    pub async fn authorize_request(
        &self,
        authorization: Option<&str>,
        acceptable: &[Permission],
    ) -> Result<Principal, GateError> {
        self.authorize_request_at(authorization, acceptable, Utc::now())
            .await
    }

    pub async fn authorize_request_at(
        &self,
        authorization: Option<&str>,
        acceptable: &[Permission],
        now: DateTime<Utc>,
    ) -> Result<Principal, GateError> {
        let identity = self.authenticate_at(authorization, now).await?;

        if !authorize_any(identity.role(), &identity.permissions, acceptable) {
            let required: Vec<String> = acceptable.iter().map(ToString::to_string).collect();
            tracing::debug!(
                user_id = %identity.principal.user_id,
                role = %identity.role(),
                ?required,
                "request forbidden"
            );
            return Err(GateError::Forbidden);
        }

        Ok(identity.into_principal())
    }

    /// Steps 1–3 only: for endpoints that need an identity but no permission.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<ResolvedIdentity, GateError> {
        self.authenticate_at(authorization, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ResolvedIdentity, GateError> {
        let token = bearer_token(authorization).ok_or(GateError::Unauthenticated)?;

        let claims = self.validator.validate(token, now).map_err(|e| {
            tracing::debug!(reason = %e, "token rejected");
            GateError::Unauthenticated
        })?;

        self.resolver.resolve(claims.user_id).await.map_err(|e| {
            match &e {
                ResolveError::Storage(_) => {
                    tracing::error!(user_id = %claims.user_id, error = %e, "identity resolution failed")
                }
                _ => tracing::debug!(user_id = %claims.user_id, reason = %e, "identity rejected"),
            }
            GateError::Unauthenticated
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively; a blank token counts as absent.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}
