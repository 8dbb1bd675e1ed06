//! Core types and utilities for credit-gate.
//!
//! This crate provides the foundational types used throughout the
//! credit-gate platform:
//!
//! - **Identifiers**: `AccountId`, `RecordId`, `FeatureId`
//! - **Accounts**: `Account`, `Role`
//! - **Registry**: `FeatureCost`
//! - **Ledger**: `UsageRecord`, `GrantRecord`
//! - **Decisions**: `Decision`
//!
//! # Credit unit
//!
//! Credits are abstract consumable units stored as `i64`. Balances are
//! invariantly non-negative; the store enforces this, callers never do.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod decision;
pub mod feature;
pub mod ids;
pub mod ledger;

pub use account::{Account, Role};
pub use decision::Decision;
pub use feature::FeatureCost;
pub use ids::{AccountId, FeatureId, IdError, RecordId, MAX_FEATURE_ID_LEN};
pub use ledger::{GrantRecord, UsageRecord};
