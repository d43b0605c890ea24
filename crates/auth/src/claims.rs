use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use backoffice_core::UserId;

/// JWT claims carried by a bearer token.
///
/// `iat`/`exp` are unix seconds as in RFC 7519. The identity claim keeps the
/// `userId` wire name issued by the login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(rename = "userId")]
    pub user_id: UserId,

    /// Issued-at timestamp. Informational only; the issuer's clock may run ahead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration timestamp.
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            iat: Some(issued_at.timestamp()),
            exp: expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,
}

/// Deterministically validate the time window of decoded claims.
///
/// A token is valid only while `now < exp`; there is no leeway. `iat` is not
/// consulted.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
