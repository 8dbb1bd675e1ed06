//! Credit balance and grant handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use credit_gate_core::{AccountId, GrantRecord};
use credit_gate_store::Store;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::guard::AccessGuard;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The account ID.
    pub account_id: String,
    /// Current credit balance.
    pub balance: i64,
}

/// Get the authenticated principal's balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<BalanceResponse>, ApiError> {
    let account = state
        .store
        .get_account(&principal.account_id)?
        .ok_or_else(|| ApiError::NotFound("account not found".into()))?;

    Ok(Json(BalanceResponse {
        account_id: account.account_id.to_string(),
        balance: account.balance,
    }))
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageQuery {
    /// Maximum number of records to return (default: 50, capped at 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

pub(crate) fn default_limit() -> usize {
    50
}

/// Grant record response.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    /// Record ID.
    pub id: String,
    /// Credits added.
    pub amount: i64,
    /// Reason for the grant.
    pub reason: String,
    /// Timestamp.
    pub granted_at: String,
}

impl From<&GrantRecord> for GrantResponse {
    fn from(record: &GrantRecord) -> Self {
        Self {
            id: record.id.to_string(),
            amount: record.amount,
            reason: record.reason.clone(),
            granted_at: record.granted_at.to_rfc3339(),
        }
    }
}

/// List grants response.
#[derive(Debug, Serialize)]
pub struct ListGrantsResponse {
    /// Grant records, newest first.
    pub grants: Vec<GrantResponse>,
}

/// List the authenticated principal's grant history.
pub async fn list_grants(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListGrantsResponse>, ApiError> {
    state
        .store
        .get_account(&principal.account_id)?
        .ok_or_else(|| ApiError::NotFound("account not found".into()))?;

    let grants = state
        .store
        .list_grants(&principal.account_id, query.limit.min(100), query.offset)?;

    Ok(Json(ListGrantsResponse {
        grants: grants.iter().map(GrantResponse::from).collect(),
    }))
}

/// Grant credits request (admin).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantCreditsRequest {
    /// Target account ID.
    pub account_id: String,
    /// Credits to add. Must be positive.
    pub amount: i64,
    /// Human-readable reason.
    pub reason: String,
}

/// Grant credits response.
#[derive(Debug, Serialize)]
pub struct GrantCreditsResponse {
    /// Target account ID.
    pub account_id: String,
    /// Credits added.
    pub amount: i64,
    /// Balance after the grant.
    pub new_balance: i64,
    /// The grant record written.
    pub record_id: String,
}

/// Admin: add credits to an account.
pub async fn grant_credits(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(body): Json<GrantCreditsRequest>,
) -> Result<Json<GrantCreditsResponse>, ApiError> {
    AccessGuard::admin_authorize(&principal)?;

    let account_id = body
        .account_id
        .parse::<AccountId>()
        .map_err(|_| ApiError::BadRequest("invalid account id".into()))?;

    let outcome = state.store.grant(&account_id, body.amount, &body.reason)?;

    tracing::info!(
        admin = %principal.account_id,
        account_id = %account_id,
        amount = body.amount,
        new_balance = outcome.new_balance,
        "Credits granted"
    );

    Ok(Json(GrantCreditsResponse {
        account_id: account_id.to_string(),
        amount: body.amount,
        new_balance: outcome.new_balance,
        record_id: outcome.record_id.to_string(),
    }))
}
