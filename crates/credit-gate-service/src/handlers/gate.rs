//! The gate endpoint.
//!
//! Feature surfaces call `POST /v1/gate/authorize` before doing any billable
//! work and proceed only on an allowed decision. The response body is always
//! the serialized decision; the HTTP status mirrors it so that plain HTTP
//! clients can branch without parsing.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use credit_gate_core::{Decision, FeatureId};

use crate::auth::OptionalPrincipal;
use crate::error::ApiError;
use crate::state::AppState;

/// Authorization request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizeRequest {
    /// The feature being invoked.
    pub feature_id: FeatureId,
}

/// A decision with its HTTP status.
#[derive(Debug)]
pub struct DecisionResponse(pub Decision);

impl IntoResponse for DecisionResponse {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Decision::Allowed { .. } | Decision::AllowedFree => StatusCode::OK,
            Decision::Denied { .. } => StatusCode::PAYMENT_REQUIRED,
            Decision::Forbidden => StatusCode::FORBIDDEN,
            Decision::NotFound { .. } => StatusCode::NOT_FOUND,
        };
        (status, Json(self.0)).into_response()
    }
}

/// Authorize one feature invocation.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    OptionalPrincipal(principal): OptionalPrincipal,
    Json(body): Json<AuthorizeRequest>,
) -> Result<DecisionResponse, ApiError> {
    let decision = state.guard.authorize(principal.as_ref(), &body.feature_id)?;

    tracing::debug!(
        feature_id = %body.feature_id,
        decision = ?decision,
        "Gate decision"
    );

    Ok(DecisionResponse(decision))
}
