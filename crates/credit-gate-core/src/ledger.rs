//! Ledger record types.
//!
//! The ledger history splits into two append-only record kinds: usage
//! records for debits and grant records for credits. An account's balance is
//! always the sum of its grants minus the sum of its usage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, FeatureId, RecordId};

/// One debit against an account.
///
/// Exactly one usage record exists per successful debit, written in the same
/// store transaction as the balance decrement. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Unique record ID (ULID for time-ordering).
    pub id: RecordId,

    /// The account that was debited.
    pub account_id: AccountId,

    /// The feature the debit paid for.
    pub feature_id: FeatureId,

    /// Credits debited.
    pub amount: i64,

    /// When the debit was committed.
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    /// Create a new usage record.
    #[must_use]
    pub fn new(account_id: AccountId, feature_id: FeatureId, amount: i64) -> Self {
        Self {
            id: RecordId::generate(),
            account_id,
            feature_id,
            amount,
            recorded_at: Utc::now(),
        }
    }
}

/// One credit added to an account.
///
/// Grants come from admin or billing operations; they never carry a usage
/// record and never apply a negative delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRecord {
    /// Unique record ID (ULID for time-ordering).
    pub id: RecordId,

    /// The account that was credited.
    pub account_id: AccountId,

    /// Credits added. Always positive.
    pub amount: i64,

    /// Human-readable reason ("promo", "purchase", ...).
    pub reason: String,

    /// When the grant was committed.
    pub granted_at: DateTime<Utc>,
}

impl GrantRecord {
    /// Create a new grant record.
    #[must_use]
    pub fn new(account_id: AccountId, amount: i64, reason: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            account_id,
            amount,
            reason: reason.into(),
            granted_at: Utc::now(),
        }
    }
}
