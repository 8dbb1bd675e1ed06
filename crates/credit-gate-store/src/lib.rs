//! `RocksDB` storage layer for credit-gate.
//!
//! This crate provides persistent storage for accounts, the feature cost
//! registry, and the append-only ledger history (usage records and grants).
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Primary account records, keyed by `account_id`
//! - `features`: Feature cost registry, keyed by `feature_id` bytes
//! - `usage_records`: Usage records, keyed by `record_id` (ULID)
//! - `usage_by_account`: Index for listing usage records by account
//! - `grants`: Grant records, keyed by `account_id || record_id`
//!
//! The balance check-and-decrement runs inside a single optimistic
//! transaction so that concurrent debits against one account can never both
//! spend the same credits, and a debit can never commit without its usage
//! record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use serde::Serialize;

use credit_gate_core::{Account, AccountId, FeatureCost, FeatureId, GrantRecord, RecordId, UsageRecord};

/// Result of a successful debit.
#[derive(Debug, Clone, Copy)]
pub struct DebitOutcome {
    /// The usage record written for this debit.
    pub record_id: RecordId,
    /// Balance after the debit.
    pub new_balance: i64,
}

/// Result of a successful grant.
#[derive(Debug, Clone, Copy)]
pub struct GrantOutcome {
    /// The grant record written.
    pub record_id: RecordId,
    /// Balance after the grant.
    pub new_balance: i64,
}

/// Aggregate usage statistics for one account.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UsageSummary {
    /// Number of usage records.
    pub count: u64,
    /// Total credits debited.
    pub total_debited: i64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations behind the ledger and registry.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update an account record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &Account) -> Result<()>;

    /// Insert an account record only if none exists yet.
    ///
    /// The existence check and the insert run in one transaction, so two
    /// concurrent registrations for the same account can never both win and
    /// a late insert can never overwrite a balance that grants have already
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountExists` if the account is already
    /// registered.
    fn create_account(&self, account: &Account) -> Result<()>;

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>>;

    /// Delete an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AccountNotFound` if the account doesn't exist.
    fn delete_account(&self, account_id: &AccountId) -> Result<()>;

    // =========================================================================
    // Feature Cost Registry
    // =========================================================================

    /// Insert or update a feature cost entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_feature(&self, feature: &FeatureCost) -> Result<()>;

    /// Get a feature cost entry by ID.
    ///
    /// The full `{cost, active}` pair is read in one lookup; callers never
    /// see a torn entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_feature(&self, feature_id: &FeatureId) -> Result<Option<FeatureCost>>;

    /// List all feature cost entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_features(&self) -> Result<Vec<FeatureCost>>;

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    /// Debit an account and record the usage atomically.
    ///
    /// The balance check, the decrement, and the usage record insert are one
    /// store transaction: no two concurrent debits can both spend the same
    /// credits, and no state where credits are removed but usage is unlogged
    /// (or vice versa) can survive. The usage record is created internally;
    /// it is not writable independently of a debit.
    ///
    /// # Errors
    ///
    /// - `StoreError::AccountNotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is below `amount`.
    /// - `StoreError::InvalidAmount` if `amount` is negative.
    /// - `StoreError::Unavailable` if the transaction could not commit;
    ///   state is unchanged and the whole debit may be retried.
    fn try_debit(
        &self,
        account_id: &AccountId,
        feature_id: &FeatureId,
        amount: i64,
    ) -> Result<DebitOutcome>;

    /// Add credits to an account and record the grant atomically.
    ///
    /// Never produces a usage record and never applies a negative delta.
    ///
    /// # Errors
    ///
    /// - `StoreError::AccountNotFound` if the account doesn't exist.
    /// - `StoreError::InvalidAmount` if `amount` is not positive.
    fn grant(&self, account_id: &AccountId, amount: i64, reason: &str) -> Result<GrantOutcome>;

    /// List usage records for an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_usage(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UsageRecord>>;

    /// List grant records for an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_grants(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GrantRecord>>;

    /// Aggregate usage statistics for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn usage_summary(&self, account_id: &AccountId) -> Result<UsageSummary>;
}
