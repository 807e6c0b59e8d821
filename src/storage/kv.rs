use std::path::Path;

use rocksdb::{IteratorMode, Options, WriteOptions, DB};

use crate::core::config::Config;
use crate::core::error::Result;

/// Ordered key-value store backing one keyspace.
///
/// A thin wrapper over a `rocksdb::DB` handle: single-key get/put/delete,
/// byte-ordered iteration, and an explicit flush. Writes request a durable
/// sync when the config asks for one (the default).
pub struct KvStore {
    db: DB,
    sync_writes: bool,
}

impl KvStore {
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(config.create_if_missing);

        let db = DB::open(&options, path)?;
        Ok(KvStore {
            db,
            sync_writes: config.sync_writes,
        })
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?)
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put_opt(key, value, &self.write_options())?;
        Ok(())
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.db.delete_opt(key, &self.write_options())?;
        Ok(())
    }

    /// Iterate every entry in key order.
    pub fn iter(&self) -> impl Iterator<Item = Result<(Box<[u8]>, Box<[u8]>)>> + '_ {
        self.db
            .iterator(IteratorMode::Start)
            .map(|entry| entry.map_err(Into::into))
    }

    /// Delete every key in the store.
    ///
    /// The iterator reads from a snapshot, so deleting the visited keys
    /// underneath it is safe.
    pub fn clear(&self) -> Result<()> {
        for entry in self.db.iterator(IteratorMode::Start) {
            let (key, _) = entry?;
            self.db.delete_opt(&key, &self.write_options())?;
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn write_options(&self) -> WriteOptions {
        let mut options = WriteOptions::default();
        options.set_sync(self.sync_writes);
        options
    }
}
