//! Key encoding utilities for `RocksDB`.

use credit_gate_core::{AccountId, FeatureId, RecordId};

/// Create an account key from an account ID.
#[must_use]
pub fn account_key(account_id: &AccountId) -> Vec<u8> {
    account_id.as_bytes().to_vec()
}

/// Create a feature key from a feature ID.
#[must_use]
pub fn feature_key(feature_id: &FeatureId) -> Vec<u8> {
    feature_id.as_ref().to_vec()
}

/// Create a usage record key from a record ID.
#[must_use]
pub fn usage_record_key(record_id: &RecordId) -> Vec<u8> {
    record_id.to_bytes().to_vec()
}

/// Create an account-scoped record key.
///
/// Format: `account_id (16 bytes) || record_id (16 bytes)`
///
/// Since ULIDs are time-ordered, records for an account sort chronologically
/// under their shared prefix. Used by both the usage index and the grants
/// column family.
#[must_use]
pub fn account_record_key(account_id: &AccountId, record_id: &RecordId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(account_id.as_bytes());
    key.extend_from_slice(&record_id.to_bytes());
    key
}

/// Create a prefix for iterating all records for an account.
#[must_use]
pub fn account_records_prefix(account_id: &AccountId) -> Vec<u8> {
    account_id.as_bytes().to_vec()
}

/// Extract the record ID from an account-scoped record key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_record_id(key: &[u8]) -> RecordId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    RecordId::from_bytes(bytes).expect("valid ULID bytes")
}
