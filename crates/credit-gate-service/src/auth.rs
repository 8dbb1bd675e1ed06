//! Authentication extractors.
//!
//! The identity provider mints HS256 JWTs carrying the account id and role;
//! this module verifies the signature, audience, and expiry, and exposes the
//! resolved [`Principal`] to handlers. Credential verification beyond that
//! is the provider's job, not ours.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use credit_gate_core::{AccountId, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated identity making a request.
#[derive(Debug, Clone)]
pub struct Principal {
    /// The account ID (from the JWT `sub` claim).
    pub account_id: AccountId,
    /// The principal's role.
    pub role: Role,
}

/// JWT claims for principal tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account UUID).
    pub sub: String,
    /// Principal role.
    pub role: Role,
    /// Audience.
    pub aud: String,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
}

/// Resolve a principal from the Authorization header, if present and valid.
fn resolve_principal(parts: &Parts, state: &AppState) -> Option<Principal> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())?;
    let token = auth_header.strip_prefix("Bearer ")?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[state.config.auth_audience.as_str()]);

    let key = DecodingKey::from_secret(state.config.auth_secret.as_bytes());
    let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected principal token");
            e
        })
        .ok()?;

    let account_id = data.claims.sub.parse::<AccountId>().ok()?;

    Some(Principal {
        account_id,
        role: data.claims.role,
    })
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve_principal(parts, state).ok_or(ApiError::Unauthorized)
    }
}

/// A principal that may be absent.
///
/// Used by the gate endpoint, where a missing or invalid session is a
/// `Forbidden` *decision* rather than an HTTP-level rejection.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(pub Option<Principal>);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalPrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_principal(parts, state)))
    }
}
