//! Error types for credit-gate storage.

use credit_gate_core::AccountId;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The account does not exist.
    #[error("account not found: {account_id}")]
    AccountNotFound {
        /// The missing account.
        account_id: AccountId,
    },

    /// The account is already registered.
    #[error("account already exists: {account_id}")]
    AccountExists {
        /// The existing account.
        account_id: AccountId,
    },

    /// Balance does not cover the debit.
    #[error("insufficient credits: balance={balance}, required={required}")]
    InsufficientCredits {
        /// Current balance.
        balance: i64,
        /// Required amount.
        required: i64,
    },

    /// A negative debit or non-positive grant amount was requested.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: i64,
    },

    /// Transient failure; the operation was rolled back and may be retried
    /// as a whole.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
