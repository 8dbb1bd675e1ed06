//! Authorization decisions.

use serde::{Deserialize, Serialize};

use crate::{FeatureId, RecordId};

/// The outcome of one authorization request.
///
/// Only `Allowed` implies that state was mutated: the debit and its usage
/// record were already committed when the decision is produced. Every other
/// variant is a pure read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// The feature is metered and the debit succeeded.
    Allowed {
        /// Credits debited.
        cost: i64,
        /// Balance after the debit.
        new_balance: i64,
        /// The usage record written for this debit.
        record_id: RecordId,
    },

    /// The feature is inactive (free); no ledger interaction happened.
    AllowedFree,

    /// The balance does not cover the feature's cost. Nothing was written.
    Denied {
        /// Credits the feature costs.
        required: i64,
        /// Current balance.
        available: i64,
    },

    /// No valid session, or the principal's account is unknown.
    Forbidden,

    /// The feature id is not registered. Unknown features are denied, never
    /// treated as free.
    NotFound {
        /// The unrecognized feature key.
        feature_id: FeatureId,
    },
}

impl Decision {
    /// Check whether the caller may proceed with the feature work.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. } | Self::AllowedFree)
    }
}
