//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait, backed by an optimistic transaction database. Ledger mutations run
//! as transactions with conflict detection on the account key; a commit
//! conflict means another writer touched the account, and the whole
//! check-and-decrement is retried against the fresh balance.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, MultiThreaded,
    OptimisticTransactionDB, Options,
};

use credit_gate_core::{
    Account, AccountId, FeatureCost, FeatureId, GrantRecord, UsageRecord,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{DebitOutcome, GrantOutcome, Store, UsageSummary};

/// Retry budget for ledger transactions that lose a commit conflict.
const MAX_TXN_RETRIES: usize = 64;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<OptimisticTransactionDB<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = OptimisticTransactionDB::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write a single key through a transaction.
    fn put_raw(&self, cf: &Arc<BoundColumnFamily<'_>>, key: &[u8], value: &[u8]) -> Result<()> {
        let txn = self.db.transaction();
        txn.put_cf(cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Check whether a transaction commit failed due to a write conflict.
    fn is_conflict(err: &rocksdb::Error) -> bool {
        matches!(
            err.kind(),
            rocksdb::ErrorKind::Busy | rocksdb::ErrorKind::TryAgain | rocksdb::ErrorKind::TimedOut
        )
    }

    /// Collect account-scoped index keys under a prefix, newest first.
    fn account_keys_newest_first(
        &self,
        cf: &Arc<BoundColumnFamily<'_>>,
        account_id: &AccountId,
    ) -> Result<Vec<Vec<u8>>> {
        let prefix = keys::account_records_prefix(account_id);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            all_keys.push(key.to_vec());
        }

        // ULID suffixes sort chronologically; reverse for newest first.
        all_keys.reverse();
        Ok(all_keys)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn put_account(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.account_id);
        let value = Self::serialize(account)?;
        self.put_raw(&cf, &key, &value)
    }

    fn create_account(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.account_id);
        let value = Self::serialize(account)?;

        for attempt in 0..MAX_TXN_RETRIES {
            let txn = self.db.transaction();

            let existing = txn
                .get_for_update_cf(&cf, &key, true)
                .map_err(|e| StoreError::Database(e.to_string()))?;
            if existing.is_some() {
                return Err(StoreError::AccountExists {
                    account_id: account.account_id,
                });
            }

            txn.put_cf(&cf, &key, &value)
                .map_err(|e| StoreError::Database(e.to_string()))?;

            match txn.commit() {
                Ok(()) => return Ok(()),
                Err(e) if Self::is_conflict(&e) => {
                    // The retry re-reads and sees whoever beat us.
                    tracing::debug!(
                        account_id = %account.account_id,
                        attempt,
                        "account create commit conflict, retrying"
                    );
                }
                Err(e) => return Err(StoreError::Database(e.to_string())),
            }
        }

        Err(StoreError::Unavailable(format!(
            "account create for {} lost {MAX_TXN_RETRIES} commit conflicts",
            account.account_id
        )))
    }

    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(account_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_account(&self, account_id: &AccountId) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(account_id);

        if self.get_account(account_id)?.is_none() {
            return Err(StoreError::AccountNotFound {
                account_id: *account_id,
            });
        }

        let txn = self.db.transaction();
        txn.delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    // =========================================================================
    // Feature Cost Registry
    // =========================================================================

    fn upsert_feature(&self, feature: &FeatureCost) -> Result<()> {
        let cf = self.cf(cf::FEATURES)?;
        let key = keys::feature_key(&feature.feature_id);
        let value = Self::serialize(feature)?;
        self.put_raw(&cf, &key, &value)
    }

    fn get_feature(&self, feature_id: &FeatureId) -> Result<Option<FeatureCost>> {
        let cf = self.cf(cf::FEATURES)?;
        let key = keys::feature_key(feature_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_features(&self) -> Result<Vec<FeatureCost>> {
        let cf = self.cf(cf::FEATURES)?;
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut features = Vec::new();
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            features.push(Self::deserialize(&value)?);
        }
        Ok(features)
    }

    // =========================================================================
    // Ledger Operations
    // =========================================================================

    fn try_debit(
        &self,
        account_id: &AccountId,
        feature_id: &FeatureId,
        amount: i64,
    ) -> Result<DebitOutcome> {
        if amount < 0 {
            return Err(StoreError::InvalidAmount { amount });
        }

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_usage = self.cf(cf::USAGE_RECORDS)?;
        let cf_by_account = self.cf(cf::USAGE_BY_ACCOUNT)?;
        let account_key = keys::account_key(account_id);

        for attempt in 0..MAX_TXN_RETRIES {
            let txn = self.db.transaction();

            // get_for_update registers the account key for conflict
            // detection: if another writer commits against it before we do,
            // our commit fails and we retry against the fresh balance.
            let raw = txn
                .get_for_update_cf(&cf_accounts, &account_key, true)
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let mut account: Account = match raw {
                Some(data) => Self::deserialize(&data)?,
                None => {
                    return Err(StoreError::AccountNotFound {
                        account_id: *account_id,
                    })
                }
            };

            if account.balance < amount {
                return Err(StoreError::InsufficientCredits {
                    balance: account.balance,
                    required: amount,
                });
            }

            account.balance -= amount;
            account.lifetime_debited += amount;
            account.updated_at = chrono::Utc::now();

            let record = UsageRecord::new(*account_id, feature_id.clone(), amount);

            txn.put_cf(&cf_accounts, &account_key, Self::serialize(&account)?)
                .map_err(|e| StoreError::Database(e.to_string()))?;
            txn.put_cf(
                &cf_usage,
                keys::usage_record_key(&record.id),
                Self::serialize(&record)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
            txn.put_cf(
                &cf_by_account,
                keys::account_record_key(account_id, &record.id),
                b"",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            match txn.commit() {
                Ok(()) => {
                    return Ok(DebitOutcome {
                        record_id: record.id,
                        new_balance: account.balance,
                    });
                }
                Err(e) if Self::is_conflict(&e) => {
                    tracing::debug!(
                        account_id = %account_id,
                        attempt,
                        "debit commit conflict, retrying"
                    );
                }
                Err(e) => return Err(StoreError::Database(e.to_string())),
            }
        }

        Err(StoreError::Unavailable(format!(
            "debit for {account_id} lost {MAX_TXN_RETRIES} commit conflicts"
        )))
    }

    fn grant(&self, account_id: &AccountId, amount: i64, reason: &str) -> Result<GrantOutcome> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount { amount });
        }

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_grants = self.cf(cf::GRANTS)?;
        let account_key = keys::account_key(account_id);

        for attempt in 0..MAX_TXN_RETRIES {
            let txn = self.db.transaction();

            let raw = txn
                .get_for_update_cf(&cf_accounts, &account_key, true)
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let mut account: Account = match raw {
                Some(data) => Self::deserialize(&data)?,
                None => {
                    return Err(StoreError::AccountNotFound {
                        account_id: *account_id,
                    })
                }
            };

            account.balance += amount;
            account.lifetime_granted += amount;
            account.updated_at = chrono::Utc::now();

            let record = GrantRecord::new(*account_id, amount, reason);

            txn.put_cf(&cf_accounts, &account_key, Self::serialize(&account)?)
                .map_err(|e| StoreError::Database(e.to_string()))?;
            txn.put_cf(
                &cf_grants,
                keys::account_record_key(account_id, &record.id),
                Self::serialize(&record)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            match txn.commit() {
                Ok(()) => {
                    return Ok(GrantOutcome {
                        record_id: record.id,
                        new_balance: account.balance,
                    });
                }
                Err(e) if Self::is_conflict(&e) => {
                    tracing::debug!(
                        account_id = %account_id,
                        attempt,
                        "grant commit conflict, retrying"
                    );
                }
                Err(e) => return Err(StoreError::Database(e.to_string())),
            }
        }

        Err(StoreError::Unavailable(format!(
            "grant for {account_id} lost {MAX_TXN_RETRIES} commit conflicts"
        )))
    }

    fn list_usage(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<UsageRecord>> {
        let cf_by_account = self.cf(cf::USAGE_BY_ACCOUNT)?;
        let cf_usage = self.cf(cf::USAGE_RECORDS)?;

        let all_keys = self.account_keys_newest_first(&cf_by_account, account_id)?;

        let mut records = Vec::new();
        for key in all_keys.into_iter().skip(offset).take(limit) {
            let record_id = keys::extract_record_id(&key);
            let raw = self
                .db
                .get_cf(&cf_usage, keys::usage_record_key(&record_id))
                .map_err(|e| StoreError::Database(e.to_string()))?;
            if let Some(data) = raw {
                records.push(Self::deserialize(&data)?);
            }
        }

        Ok(records)
    }

    fn list_grants(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GrantRecord>> {
        let cf_grants = self.cf(cf::GRANTS)?;
        let prefix = keys::account_records_prefix(account_id);
        let iter = self
            .db
            .iterator_cf(&cf_grants, IteratorMode::From(&prefix, Direction::Forward));

        let mut all: Vec<GrantRecord> = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            all.push(Self::deserialize(&value)?);
        }

        all.reverse();
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    fn usage_summary(&self, account_id: &AccountId) -> Result<UsageSummary> {
        let cf_by_account = self.cf(cf::USAGE_BY_ACCOUNT)?;
        let cf_usage = self.cf(cf::USAGE_RECORDS)?;

        let mut summary = UsageSummary::default();
        for key in self.account_keys_newest_first(&cf_by_account, account_id)? {
            let record_id = keys::extract_record_id(&key);
            let raw = self
                .db
                .get_cf(&cf_usage, keys::usage_record_key(&record_id))
                .map_err(|e| StoreError::Database(e.to_string()))?;
            if let Some(data) = raw {
                let record: UsageRecord = Self::deserialize(&data)?;
                summary.count += 1;
                summary.total_debited += record.amount;
            }
        }

        Ok(summary)
    }
}
