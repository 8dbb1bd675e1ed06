//! Request and response types for the credit-gate client.

use serde::{Deserialize, Serialize};

/// Gate authorization request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    /// The feature key about to be invoked.
    pub feature_id: String,
}

/// Account details.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    /// The account ID.
    pub account_id: String,
    /// Current balance.
    pub balance: i64,
    /// Role.
    pub role: String,
    /// Lifetime credits granted.
    pub lifetime_granted: i64,
    /// Lifetime credits debited.
    pub lifetime_debited: i64,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Balance details.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// The account ID.
    pub account_id: String,
    /// Current credit balance.
    pub balance: i64,
}

/// Grant credits request (admin).
#[derive(Debug, Clone, Serialize)]
pub struct GrantCreditsRequest {
    /// Target account ID.
    pub account_id: String,
    /// Credits to add. Must be positive.
    pub amount: i64,
    /// Human-readable reason.
    pub reason: String,
}

/// Grant credits outcome.
#[derive(Debug, Clone, Deserialize)]
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

/// Upsert feature request (admin).
#[derive(Debug, Clone, Serialize)]
pub struct UpsertFeatureRequest {
    /// Credits per invocation. Must be non-negative.
    pub cost: i64,
    /// Whether metering is active.
    pub active: bool,
}

/// Feature cost details.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureResponse {
    /// The feature key.
    pub feature_id: String,
    /// Credits per invocation.
    pub cost: i64,
    /// Whether metering is active.
    pub active: bool,
    /// Last write timestamp (RFC 3339).
    pub updated_at: String,
}

/// Feature listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFeaturesResponse {
    /// All registered feature cost entries.
    pub features: Vec<FeatureResponse>,
}

/// One usage record.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageResponse {
    /// Record ID.
    pub id: String,
    /// The debited account.
    pub account_id: String,
    /// The feature invoked.
    pub feature_id: String,
    /// Credits debited.
    pub amount: i64,
    /// Timestamp (RFC 3339).
    pub recorded_at: String,
}

/// Aggregate usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageSummaryResponse {
    /// Total number of usage records.
    pub count: u64,
    /// Total credits debited.
    pub total_debited: i64,
}

/// Usage listing with summary.
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsageResponse {
    /// Usage records, newest first.
    pub records: Vec<UsageResponse>,
    /// Aggregate statistics for the account.
    pub summary: UsageSummaryResponse,
}

/// Error envelope returned by the service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Error details within the envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
