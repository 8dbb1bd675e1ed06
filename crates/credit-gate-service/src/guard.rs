//! The access guard.
//!
//! Every metered endpoint calls [`AccessGuard::authorize`] before doing its
//! external work; admin endpoints call [`AccessGuard::admin_authorize`].

use std::sync::Arc;

use credit_gate_core::{Decision, FeatureId};
use credit_gate_store::{Result, RocksStore, Store, StoreError};

use crate::auth::Principal;
use crate::error::ApiError;

/// Gates feature access against the cost registry and the credit ledger.
#[derive(Clone)]
pub struct AccessGuard {
    store: Arc<RocksStore>,
}

impl AccessGuard {
    /// Create a new access guard over a store handle.
    #[must_use]
    pub fn new(store: Arc<RocksStore>) -> Self {
        Self { store }
    }

    /// Authorize one feature invocation for a principal.
    ///
    /// - No principal: `Forbidden`.
    /// - Unknown feature: `NotFound` (unknown is denied, never free).
    /// - Inactive feature: `AllowedFree`, no ledger interaction.
    /// - Active feature: atomic debit; `Allowed` with the committed usage
    ///   record on success, `Denied` with nothing written otherwise.
    ///
    /// Only the `Allowed` path mutates state.
    ///
    /// # Errors
    ///
    /// Propagates store failures, including `AccountNotFound` for a
    /// principal whose account was never registered. A transient
    /// `Unavailable` leaves state unchanged; the whole authorization is
    /// safe to retry.
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        feature_id: &FeatureId,
    ) -> Result<Decision> {
        let Some(principal) = principal else {
            return Ok(Decision::Forbidden);
        };

        let Some(entry) = self.store.get_feature(feature_id)? else {
            return Ok(Decision::NotFound {
                feature_id: feature_id.clone(),
            });
        };

        if !entry.active {
            return Ok(Decision::AllowedFree);
        }

        match self
            .store
            .try_debit(&principal.account_id, feature_id, entry.cost)
        {
            Ok(outcome) => {
                tracing::info!(
                    account_id = %principal.account_id,
                    feature_id = %feature_id,
                    cost = entry.cost,
                    new_balance = outcome.new_balance,
                    "Debit authorized"
                );
                Ok(Decision::Allowed {
                    cost: entry.cost,
                    new_balance: outcome.new_balance,
                    record_id: outcome.record_id,
                })
            }
            Err(StoreError::InsufficientCredits { balance, required }) => Ok(Decision::Denied {
                required,
                available: balance,
            }),
            Err(e) => Err(e),
        }
    }

    /// Authorize an admin-only operation by role check alone.
    ///
    /// Never touches the ledger.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` unless the principal's role is admin.
    pub fn admin_authorize(principal: &Principal) -> std::result::Result<(), ApiError> {
        if principal.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
