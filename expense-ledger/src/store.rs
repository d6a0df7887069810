//! Ledger Store interface and bindings
//!
//! The store is an external collaborator behind an object-safe trait so a
//! fake can be injected in tests. Two bindings ship here:
//!
//! - [`MemoryStore`] — `BTreeMap` behind a `RwLock`, for tests and dev
//! - [`RocksDbStore`] — single `entries` column family keyed by the
//!   composite `(userId, timestamp)` key, bincode values
//!
//! # Key layout
//!
//! `userId | 0x00 | timestamp | [0x00 | id]`
//!
//! The 0x00 separator keeps `u1` from matching `u10` on a prefix query.
//! It is unambiguous because the operations reject a `userId` containing
//! a NUL byte before any key is derived. The optional id suffix is the
//! collision policy: with id minting enabled two same-microsecond inserts
//! get distinct keys; without it the later write overwrites the earlier
//! one.

use crate::config::Config;
use crate::types::LedgerEntry;
use parking_lot::RwLock;
use rocksdb::{BoundColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use thiserror::Error;

/// Store-layer errors, surfaced to callers as opaque 500s
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend failure (network, capacity, permission)
    #[error("Storage error: {0}")]
    Backend(String),

    /// Value encoding/decoding failure
    #[error("Serialization error: {0}")]
    Codec(#[from] bincode::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Key-value storage contract for ledger entries
///
/// Every call is a potential network call: it may time out or fail
/// transiently, and the core never retries a `put` (blind retries are
/// unsafe without id-based deduplication).
pub trait LedgerStore: Send + Sync {
    /// Durably write one entry
    fn put(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Enumerate the store's entire contents, native order
    fn scan(&self) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Range query over one user's partition, key order
    fn query_by_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// Composite storage key for an entry
pub(crate) fn entry_key(entry: &LedgerEntry) -> Vec<u8> {
    let mut key = user_prefix(entry.user_id.as_str());
    key.extend_from_slice(entry.timestamp_key().as_bytes());
    if let Some(id) = entry.id {
        key.push(0);
        key.extend_from_slice(id.as_bytes());
    }
    key
}

/// Partition prefix for one user, separator included
pub(crate) fn user_prefix(user_id: &str) -> Vec<u8> {
    let mut prefix = user_id.as_bytes().to_vec();
    prefix.push(0);
    prefix
}

/// In-memory store binding
///
/// Ordered map keyed by the composite key, so `query_by_user` behaves like
/// the production range query.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Vec<u8>, LedgerEntry>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    fn put(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(entry_key(entry), entry.clone());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.entries.read().values().cloned().collect())
    }

    fn query_by_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        let prefix = user_prefix(user_id);
        let entries = self.entries.read();

        Ok(entries
            .range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

/// Column family name
const CF_ENTRIES: &str = "entries";

/// RocksDB store binding
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl std::fmt::Debug for RocksDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbStore").finish_non_exhaustive()
    }
}

impl RocksDbStore {
    /// Open or create the database under `config.data_dir`
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_ENTRIES,
            Self::cf_options_entries(),
        )];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = %path.display(), "Opened RocksDB expense store");

        Ok(Self { db: Arc::new(db) })
    }

    fn cf_options_entries() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    // Multi-threaded column family mode hands out shared handles
    fn cf_handle(&self) -> Result<Arc<BoundColumnFamily<'_>>, StoreError> {
        self.db
            .cf_handle(CF_ENTRIES)
            .ok_or_else(|| StoreError::Backend(format!("Column family {} not found", CF_ENTRIES)))
    }
}

impl LedgerStore for RocksDbStore {
    fn put(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let cf = self.cf_handle()?;
        let key = entry_key(entry);
        let value = bincode::serialize(entry)?;

        self.db.put_cf(&cf, &key, &value)?;

        tracing::debug!(
            user_id = %entry.user_id,
            timestamp = %entry.timestamp_key(),
            "Entry stored"
        );

        Ok(())
    }

    fn scan(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let cf = self.cf_handle()?;

        let mut entries = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            entries.push(bincode::deserialize(&value)?);
        }

        Ok(entries)
    }

    fn query_by_user(&self, user_id: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        let cf = self.cf_handle()?;
        let prefix = user_prefix(user_id);

        // prefix_iterator seeks to the prefix but runs to the end of the
        // column family, so the prefix check stays explicit
        let mut entries = Vec::new();
        for item in self.db.prefix_iterator_cf(&cf, &prefix) {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            entries.push(bincode::deserialize(&value)?);
        }

        Ok(entries)
    }
}
