use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use subtle::ConstantTimeEq;

use crate::error::CatalogError;
use crate::router::CatalogState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Ensure the inbound request carries the admin key.
/// Accepts either:
/// - Header: `x-admin-key: ...`
/// - Header: `Authorization: Bearer ...`
///
/// An empty configured key rejects everything.
pub fn ensure_admin(headers: &HeaderMap, expected: &str) -> Result<(), CatalogError> {
    if expected.is_empty() {
        return Err(CatalogError::Unauthorized);
    }

    if let Some(hv) = headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok())
        && key_matches(hv, expected)
    {
        return Ok(());
    }

    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && key_matches(token.trim(), expected)
        {
            return Ok(());
        }
    }

    Err(CatalogError::Unauthorized)
}

fn key_matches(given: &str, expected: &str) -> bool {
    bool::from(given.as_bytes().ct_eq(expected.as_bytes()))
}

/// Extractor guarding admin write routes.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminKey;

impl FromRequestParts<CatalogState> for RequireAdminKey {
    type Rejection = CatalogError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CatalogState,
    ) -> Result<Self, Self::Rejection> {
        ensure_admin(&parts.headers, &state.admin_key)?;
        Ok(Self)
    }
}
