//! Bearer token verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Why a token was rejected.
///
/// Only for server-side logs. Callers above the gate never see the variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("signature verification failed")]
    BadSignature,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
///
/// Implementations must be pure with respect to `(token, key, now)`.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// HMAC-SHA256 validator over a shared secret.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The time window is checked against the injected clock in `validate_claims`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256JwtValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256JwtValidator").finish_non_exhaustive()
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            },
        )?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::UserId;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn mint(secret: &str, claims: &impl serde::Serialize) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("failed to encode jwt")
    }

    #[test]
    fn accepts_valid_token() {
        let now = Utc::now();
        let claims = JwtClaims::new(UserId::new(3), now, now + Duration::minutes(10));
        let token = mint(SECRET, &claims);

        let v = Hs256JwtValidator::new(SECRET);
        assert_eq!(v.validate(&token, now).unwrap(), claims);
    }

    #[test]
    fn accepts_token_from_issuer_with_clock_ahead() {
        let now = Utc::now();
        let issued = now + Duration::seconds(2);
        let claims = JwtClaims::new(UserId::new(3), issued, now + Duration::minutes(10));
        let token = mint(SECRET, &claims);

        let v = Hs256JwtValidator::new(SECRET);
        assert_eq!(v.validate(&token, now), Ok(claims));
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let claims = JwtClaims::new(UserId::new(3), now, now + Duration::minutes(10));
        let token = mint("other-secret", &claims);

        let v = Hs256JwtValidator::new(SECRET);
        assert_eq!(v.validate(&token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn rejects_expired_token_against_injected_clock() {
        let issued = Utc::now();
        let claims = JwtClaims::new(UserId::new(3), issued, issued + Duration::minutes(10));
        let token = mint(SECRET, &claims);

        let v = Hs256JwtValidator::new(SECRET);
        let later = issued + Duration::minutes(11);
        assert_eq!(
            v.validate(&token, later),
            Err(TokenError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn rejects_garbage() {
        let v = Hs256JwtValidator::new(SECRET);
        for token in ["", "not-a-jwt", "a.b.c"] {
            assert!(matches!(
                v.validate(token, Utc::now()),
                Err(TokenError::Malformed(_))
            ));
        }
    }

    #[test]
    fn rejects_token_without_exp() {
        let token = mint(SECRET, &serde_json::json!({ "userId": 3 }));
        let v = Hs256JwtValidator::new(SECRET);
        assert!(matches!(
            v.validate(&token, Utc::now()),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_unsigned_token() {
        // alg=none header with a valid-looking payload and empty signature.
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let payload = "eyJ1c2VySWQiOjMsImV4cCI6OTk5OTk5OTk5OX0";
        let token = format!("{header}.{payload}.");
        let v = Hs256JwtValidator::new(SECRET);
        assert!(v.validate(&token, Utc::now()).is_err());
    }
}
