//! Identifier types for credit-gate.
//!
//! This module provides strongly-typed identifiers for accounts, ledger
//! records, and features.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use ulid::Ulid;

/// An account identifier (UUID format, issued by the identity provider).
///
/// Account IDs arrive in JWT `sub` claims; credit-gate never mints them
/// outside of tests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(uuid::Uuid);

impl AccountId {
    /// Create a new `AccountId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `AccountId` (for testing).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A ledger record identifier using ULID for time-ordering.
///
/// Usage and grant records share this ID type; ULIDs sort chronologically,
/// which the store relies on for newest-first listings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(Ulid);

impl RecordId {
    /// Create a new `RecordId` from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Generate a new `RecordId` with the current timestamp.
    ///
    /// IDs minted by the same process are strictly monotonic even within a
    /// single millisecond, so storage keys sort in creation order.
    #[must_use]
    pub fn generate() -> Self {
        static GENERATOR: OnceLock<Mutex<ulid::Generator>> = OnceLock::new();
        let mut generator = GENERATOR
            .get_or_init(|| Mutex::new(ulid::Generator::new()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Overflow of the random component within one millisecond is the
        // only failure mode; a fresh random ULID is an acceptable fallback.
        Self(generator.generate().unwrap_or_else(|_| Ulid::new()))
    }

    /// Return the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> &Ulid {
        &self.0
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `RecordId` from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are invalid.
    pub fn from_bytes(bytes: [u8; 16]) -> Result<Self, IdError> {
        Ok(Self(Ulid::from_bytes(bytes)))
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0.to_string()
    }
}

/// A feature identifier: a lowercase string key such as `copywriting.generate`.
///
/// Feature IDs are chosen by operators when registering costs and echoed by
/// feature surfaces at authorization time. They are restricted to
/// `[a-z0-9._-]`, 1 to 64 characters, so they can double as raw storage keys.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId(String);

/// Maximum length of a feature identifier.
pub const MAX_FEATURE_ID_LEN: usize = 64;

impl FeatureId {
    /// Create a `FeatureId`, validating the key format.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidFeatureId` if the key is empty, too long, or
    /// contains characters outside `[a-z0-9._-]`.
    pub fn new(key: impl Into<String>) -> Result<Self, IdError> {
        let key = key.into();
        if key.is_empty() || key.len() > MAX_FEATURE_ID_LEN {
            return Err(IdError::InvalidFeatureId);
        }
        if !key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'.' | b'_' | b'-'))
        {
            return Err(IdError::InvalidFeatureId);
        }
        Ok(Self(key))
    }

    /// Return the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FeatureId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FeatureId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for FeatureId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,

    /// The input is not a valid feature key.
    #[error("invalid feature id: expected 1-64 chars of [a-z0-9._-]")]
    InvalidFeatureId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_roundtrip() {
        let id = AccountId::generate();
        let str_repr = id.to_string();
        let parsed = AccountId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn account_id_serde_json() {
        let id = AccountId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn account_id_rejects_garbage() {
        assert_eq!(
            AccountId::from_str("not-a-uuid").unwrap_err(),
            IdError::InvalidUuid
        );
    }

    #[test]
    fn record_id_roundtrip() {
        let id = RecordId::generate();
        let str_repr = id.to_string();
        let parsed = RecordId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn record_ids_are_monotonic() {
        let ids: Vec<RecordId> = (0..100).map(|_| RecordId::generate()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0].to_bytes() < pair[1].to_bytes());
        }
    }

    #[test]
    fn record_id_bytes_roundtrip() {
        let id = RecordId::generate();
        let bytes = id.to_bytes();
        let parsed = RecordId::from_bytes(bytes).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn feature_id_accepts_valid_keys() {
        for key in ["copywriting.generate", "hashtags", "export_pdf", "a-b.c_d9"] {
            assert!(FeatureId::new(key).is_ok(), "expected valid: {key}");
        }
    }

    #[test]
    fn feature_id_rejects_invalid_keys() {
        let too_long = "x".repeat(65);
        for key in ["", "UPPER", "has space", "emoji🦀", too_long.as_str()] {
            assert_eq!(
                FeatureId::new(key).unwrap_err(),
                IdError::InvalidFeatureId,
                "expected invalid: {key}"
            );
        }
    }

    #[test]
    fn feature_id_serde_rejects_invalid() {
        let result: Result<FeatureId, _> = serde_json::from_str("\"Bad Key\"");
        assert!(result.is_err());
    }
}
