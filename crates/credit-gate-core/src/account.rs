//! Account types for credit-gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// A metered account.
///
/// The account tracks the authoritative credit balance and the principal's
/// role. The balance is mutated only through ledger operations in the store;
/// nothing else writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The account ID (from the identity provider).
    pub account_id: AccountId,

    /// Current credit balance. Never negative.
    pub balance: i64,

    /// Role of the principal owning this account.
    pub role: Role,

    /// Lifetime credits granted.
    pub lifetime_granted: i64,

    /// Lifetime credits debited for feature usage.
    pub lifetime_debited: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance.
    #[must_use]
    pub fn new(account_id: AccountId, role: Role) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            balance: 0,
            role,
            lifetime_granted: 0,
            lifetime_debited: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the balance covers an amount.
    #[must_use]
    pub fn has_sufficient_credits(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

/// Role of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular end user: may spend credits, never administer them.
    User,

    /// Administrator: may edit feature costs, grant credits, and read
    /// usage statistics for any account.
    Admin,
}

impl Role {
    /// Check whether this role carries admin rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
