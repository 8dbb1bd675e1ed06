//! Feature cost registry handlers (admin only).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use credit_gate_core::{FeatureCost, FeatureId};
use credit_gate_store::Store;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::guard::AccessGuard;
use crate::state::AppState;

/// Feature cost response.
#[derive(Debug, Serialize)]
pub struct FeatureResponse {
    /// The feature key.
    pub feature_id: String,
    /// Credits per invocation.
    pub cost: i64,
    /// Whether metering is active.
    pub active: bool,
    /// Last write timestamp.
    pub updated_at: String,
}

impl From<&FeatureCost> for FeatureResponse {
    fn from(entry: &FeatureCost) -> Self {
        Self {
            feature_id: entry.feature_id.to_string(),
            cost: entry.cost,
            active: entry.active,
            updated_at: entry.updated_at.to_rfc3339(),
        }
    }
}

/// Upsert feature request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertFeatureRequest {
    /// Credits per invocation. Must be non-negative.
    pub cost: i64,
    /// Whether metering is active.
    pub active: bool,
}

fn parse_feature_id(raw: &str) -> Result<FeatureId, ApiError> {
    raw.parse::<FeatureId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Admin: create or update a feature cost entry.
pub async fn upsert_feature(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(feature_id): Path<String>,
    Json(body): Json<UpsertFeatureRequest>,
) -> Result<Json<FeatureResponse>, ApiError> {
    AccessGuard::admin_authorize(&principal)?;

    let feature_id = parse_feature_id(&feature_id)?;
    if body.cost < 0 {
        return Err(ApiError::BadRequest(format!(
            "cost must be non-negative, got {}",
            body.cost
        )));
    }

    let entry = FeatureCost::new(feature_id, body.cost, body.active);
    state.store.upsert_feature(&entry)?;

    tracing::info!(
        admin = %principal.account_id,
        feature_id = %entry.feature_id,
        cost = entry.cost,
        active = entry.active,
        "Feature cost updated"
    );

    Ok(Json(FeatureResponse::from(&entry)))
}

/// Admin: get one feature cost entry.
pub async fn get_feature(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(feature_id): Path<String>,
) -> Result<Json<FeatureResponse>, ApiError> {
    AccessGuard::admin_authorize(&principal)?;

    let feature_id = parse_feature_id(&feature_id)?;
    let entry = state
        .store
        .get_feature(&feature_id)?
        .ok_or_else(|| ApiError::NotFound(format!("feature not found: {feature_id}")))?;

    Ok(Json(FeatureResponse::from(&entry)))
}

/// List features response.
#[derive(Debug, Serialize)]
pub struct ListFeaturesResponse {
    /// All registered feature cost entries.
    pub features: Vec<FeatureResponse>,
}

/// Admin: list all feature cost entries.
pub async fn list_features(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<ListFeaturesResponse>, ApiError> {
    AccessGuard::admin_authorize(&principal)?;

    let features = state.store.list_features()?;
    Ok(Json(ListFeaturesResponse {
        features: features.iter().map(FeatureResponse::from).collect(),
    }))
}
