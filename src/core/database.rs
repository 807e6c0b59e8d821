use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{to_document, Document, TextIndexed, ID_FIELD};
use crate::index::manager::IndexManager;
use crate::query::ast::Query;
use crate::query::executor::QueryExecutor;
use crate::storage::keys;
use crate::storage::kv::KvStore;
use crate::storage::layout::StorageLayout;

/// Options for `find_many`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    /// Maximum number of documents to return; `0` means unbounded.
    pub limit: usize,
}

/// An embedded document database rooted at a filesystem path.
///
/// Owns the three keyspaces for its lifetime: the primary document store,
/// the path-value index, and the inverted text index. Designed for
/// single-threaded access by one process; opening two instances on the same
/// path concurrently is undefined.
pub struct Database {
    store: Arc<KvStore>,
    index: Arc<KvStore>,
    text_index: Arc<KvStore>,
    manager: IndexManager,
    executor: QueryExecutor,
}

impl Database {
    /// Open (creating if missing) the keyspaces at `path`, `path.index`,
    /// and `path.text_index`.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Database::open_with_config(Config::new(path))
    }

    pub fn open_with_config(config: Config) -> Result<Self> {
        let layout = StorageLayout::new(&config.root);
        let store = Arc::new(KvStore::open(&layout.store_dir, &config)?);
        let index = Arc::new(KvStore::open(&layout.index_dir, &config)?);
        let text_index = Arc::new(KvStore::open(&layout.text_index_dir, &config)?);

        let analyzer = Arc::new(Analyzer::standard_english());
        let manager = IndexManager::new(index.clone(), text_index.clone(), analyzer);
        let executor = QueryExecutor::new(store.clone(), manager.clone());

        debug!(root = %config.root.display(), "opened database");
        Ok(Database {
            store,
            index,
            text_index,
            manager,
            executor,
        })
    }

    /// Insert a record into a collection and return its generated id.
    ///
    /// The record is normalized to a document map and assigned a fresh
    /// `_id`, written to the primary keyspace, then indexed: every
    /// path-value pair joins the secondary index, and each field named by
    /// the record's `TextIndexed` annotation joins the inverted index.
    pub fn insert_one<T>(&self, collection: &str, record: &T) -> Result<String>
    where
        T: Serialize + TextIndexed,
    {
        validate_collection_name(collection)?;

        let id = Uuid::new_v4().to_string();
        let mut document = to_document(record)?;
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let key = keys::doc_key(collection, &id);
        if self.store.get(&key)?.is_some() {
            return Err(Error::new(ErrorKind::DuplicateKey, id));
        }

        self.store.put(&key, &serde_json::to_vec(&document)?)?;
        self.manager.index_document(collection, &id, &document)?;
        self.manager
            .index_text_fields(collection, &id, &document, T::text_index_fields())?;

        debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    /// Insert records in order; the first failure aborts and is returned.
    pub fn insert_many<T>(&self, collection: &str, records: &[T]) -> Result<Vec<String>>
    where
        T: Serialize + TextIndexed,
    {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.insert_one(collection, record)?);
        }
        Ok(ids)
    }

    /// Fetch a document by id.
    pub fn find_one_by_id(&self, collection: &str, id: &str) -> Result<Document> {
        match self.store.get(&keys::doc_key(collection, id))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(Error::new(
                ErrorKind::DocumentNotExists,
                format!("{collection}:{id}"),
            )),
        }
    }

    /// Return the first document matching a query.
    pub fn find_one(&self, collection: &str, query: &Query) -> Result<Document> {
        let documents = self.find_many(collection, query, FindOptions { limit: 1 })?;
        documents
            .into_iter()
            .next()
            .ok_or_else(|| Error::new(ErrorKind::NoDocuments, collection))
    }

    /// Return the documents matching a query, up to `options.limit`.
    /// An empty result is an empty list, not an error.
    pub fn find_many(
        &self,
        collection: &str,
        query: &Query,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        self.executor.find_many(collection, query, options.limit)
    }

    /// Delete a document by id, removing its secondary and inverted index
    /// contributions first so no posting list outlives the document.
    pub fn delete_one_by_id(&self, collection: &str, id: &str) -> Result<()> {
        let document = self.find_one_by_id(collection, id)?;

        self.manager.deindex_document(collection, id, &document)?;
        self.manager.deindex_text_fields(collection, id, &document)?;
        self.store.delete(&keys::doc_key(collection, id))?;

        debug!(collection, id, "deleted document");
        Ok(())
    }

    /// Full-text search over the collection's text-indexed fields.
    pub fn search(&self, collection: &str, text: &str) -> Result<Vec<Document>> {
        self.executor.search(collection, text)
    }

    /// Delete every key in all three keyspaces.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        self.index.clear()?;
        self.text_index.clear()?;
        debug!("cleared database");
        Ok(())
    }

    /// Flush and release the keyspaces. Every handle is flushed even when
    /// an earlier one fails; the first error is returned.
    pub fn close(self) -> Result<()> {
        let mut first_error = None;
        for kv in [&self.store, &self.index, &self.text_index] {
            if let Err(err) = kv.flush() {
                first_error.get_or_insert(err);
            }
        }
        debug!("closed database");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Dump the path-value index as `(key, posting list)` text pairs.
    pub fn index_entries(&self) -> Result<Vec<(String, String)>> {
        dump(&self.index)
    }

    /// Dump the inverted text index as `(key, posting list)` text pairs.
    pub fn text_index_entries(&self) -> Result<Vec<(String, String)>> {
        dump(&self.text_index)
    }
}

fn dump(kv: &KvStore) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for entry in kv.iter() {
        let (key, value) = entry?;
        entries.push((
            String::from_utf8_lossy(&key).into_owned(),
            String::from_utf8_lossy(&value).into_owned(),
        ));
    }
    Ok(entries)
}

/// Collection names become key prefixes, so they must be non-empty and
/// colon-free; the scan path would otherwise misattribute documents.
fn validate_collection_name(collection: &str) -> Result<()> {
    if collection.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "collection name must not be empty",
        ));
    }
    if collection.contains(':') {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            format!("collection name must not contain ':': {collection}"),
        ));
    }
    Ok(())
}
