//! Feature cost registry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FeatureId;

/// The metering entry for one feature.
///
/// `cost` is only meaningful while `active` is true; an inactive feature is
/// free and unmetered. The whole record is read in a single store lookup, so
/// one authorization decision never sees a torn `cost`/`active` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCost {
    /// The feature key.
    pub feature_id: FeatureId,

    /// Credits debited per invocation. Never negative.
    pub cost: i64,

    /// Whether metering is active for this feature.
    pub active: bool,

    /// When this entry was last written.
    pub updated_at: DateTime<Utc>,
}

impl FeatureCost {
    /// Create a new feature cost entry.
    #[must_use]
    pub fn new(feature_id: FeatureId, cost: i64, active: bool) -> Self {
        Self {
            feature_id,
            cost,
            active,
            updated_at: Utc::now(),
        }
    }
}
