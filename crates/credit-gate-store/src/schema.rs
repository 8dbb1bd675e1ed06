//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `account_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Feature cost registry, keyed by `feature_id` bytes.
    pub const FEATURES: &str = "features";

    /// Usage records, keyed by `record_id` (ULID).
    pub const USAGE_RECORDS: &str = "usage_records";

    /// Index: usage records by account, keyed by `account_id || record_id`.
    /// Value is empty (index only).
    pub const USAGE_BY_ACCOUNT: &str = "usage_by_account";

    /// Grant records, keyed by `account_id || record_id`.
    pub const GRANTS: &str = "grants";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::FEATURES,
        cf::USAGE_RECORDS,
        cf::USAGE_BY_ACCOUNT,
        cf::GRANTS,
    ]
}
