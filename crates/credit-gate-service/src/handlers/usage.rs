//! Usage statistics handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use credit_gate_core::{AccountId, UsageRecord};
use credit_gate_store::{Store, UsageSummary};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::guard::AccessGuard;
use crate::handlers::credits::{default_limit, PageQuery};
use crate::state::AppState;

/// Usage record response.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    /// Record ID.
    pub id: String,
    /// The debited account.
    pub account_id: String,
    /// The feature invoked.
    pub feature_id: String,
    /// Credits debited.
    pub amount: i64,
    /// Timestamp.
    pub recorded_at: String,
}

impl From<&UsageRecord> for UsageResponse {
    fn from(record: &UsageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            account_id: record.account_id.to_string(),
            feature_id: record.feature_id.to_string(),
            amount: record.amount,
            recorded_at: record.recorded_at.to_rfc3339(),
        }
    }
}

/// Usage listing response.
#[derive(Debug, Serialize)]
pub struct ListUsageResponse {
    /// Usage records, newest first.
    pub records: Vec<UsageResponse>,
    /// Aggregate statistics for the account (all records, not just this
    /// page).
    pub summary: UsageSummary,
}

/// Admin usage query parameters.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminUsageQuery {
    /// The account to inspect.
    pub account_id: String,
    /// Maximum number of records to return (default: 50, capped at 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

/// Admin: usage statistics for any account.
pub async fn list_usage(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Query(query): Query<AdminUsageQuery>,
) -> Result<Json<ListUsageResponse>, ApiError> {
    AccessGuard::admin_authorize(&principal)?;

    let account_id = query
        .account_id
        .parse::<AccountId>()
        .map_err(|_| ApiError::BadRequest("invalid account id".into()))?;

    state
        .store
        .get_account(&account_id)?
        .ok_or_else(|| ApiError::NotFound(format!("account not found: {account_id}")))?;

    build_listing(&state, &account_id, query.limit.min(100), query.offset)
}

/// The authenticated principal's own usage history.
pub async fn my_usage(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListUsageResponse>, ApiError> {
    state
        .store
        .get_account(&principal.account_id)?
        .ok_or_else(|| ApiError::NotFound("account not found".into()))?;

    build_listing(
        &state,
        &principal.account_id,
        query.limit.min(100),
        query.offset,
    )
}

fn build_listing(
    state: &AppState,
    account_id: &AccountId,
    limit: usize,
    offset: usize,
) -> Result<Json<ListUsageResponse>, ApiError> {
    let records = state.store.list_usage(account_id, limit, offset)?;
    let summary = state.store.usage_summary(account_id)?;

    Ok(Json(ListUsageResponse {
        records: records.iter().map(UsageResponse::from).collect(),
        summary,
    }))
}
