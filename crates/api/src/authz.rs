//! API-side guard: run the authorization gate before a handler does any work.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use backoffice_auth::{AuthorizationGate, Permission, Principal, ResolvedIdentity};

use crate::app::errors::ApiError;

/// Raw `Authorization` header value.
///
/// A value that isn't visible ASCII is treated as absent.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()
}

/// Require any one of `acceptable` for the caller.
pub async fn require_any(
    gate: &AuthorizationGate,
    headers: &HeaderMap,
    acceptable: &[Permission],
) -> Result<Principal, ApiError> {
    Ok(gate
        .authorize_request(authorization_header(headers), acceptable)
        .await?)
}

/// Require an authenticated caller, no specific permission.
pub async fn require_identity(
    gate: &AuthorizationGate,
    headers: &HeaderMap,
) -> Result<ResolvedIdentity, ApiError> {
    Ok(gate.authenticate(authorization_header(headers)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_or_opaque_header_reads_as_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff").unwrap());
        assert_eq!(authorization_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization_header(&headers), Some("Bearer abc"));
    }
}
