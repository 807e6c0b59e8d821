use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::core::types::{Document, ID_FIELD};
use crate::index::path_value::path_values;
use crate::index::posting::PostingList;
use crate::storage::keys;
use crate::storage::kv::KvStore;

/// Maintains the path-value and inverted indexes consistent with the
/// primary keyspace under insert and delete.
///
/// Holds shared handles to the two index keyspaces; all mutation flows
/// through the database's single-writer surface. Within one document the
/// per-key updates are not atomic as a group, so a crash mid-way can leave
/// stray postings; query-side re-verification screens those out.
#[derive(Clone)]
pub struct IndexManager {
    index: Arc<KvStore>,
    text_index: Arc<KvStore>,
    analyzer: Arc<Analyzer>,
}

impl IndexManager {
    pub fn new(index: Arc<KvStore>, text_index: Arc<KvStore>, analyzer: Arc<Analyzer>) -> Self {
        IndexManager {
            index,
            text_index,
            analyzer,
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Add a document's path-value pairs to the secondary index.
    pub fn index_document(&self, collection: &str, id: &str, document: &Document) -> Result<()> {
        for (path, value) in path_values(document) {
            let key = keys::index_key(collection, &path, &value);
            trace!(collection, id, path = %path, "indexing path-value pair");
            self.append_posting(&self.index, &key, id)?;
        }
        Ok(())
    }

    /// Remove a document's path-value pairs from the secondary index.
    ///
    /// `document` must be the stored form; callers re-read before deleting.
    /// A missing posting list counts as empty, not as an error.
    pub fn deindex_document(&self, collection: &str, id: &str, document: &Document) -> Result<()> {
        for (path, value) in path_values(document) {
            let key = keys::index_key(collection, &path, &value);
            trace!(collection, id, path = %path, "removing path-value pair");
            self.remove_posting(&self.index, &key, id)?;
        }
        Ok(())
    }

    /// Add the annotated text fields of a document to the inverted index.
    ///
    /// Only fields named in `fields` whose values are strings contribute.
    /// Repeated tokens within one field land once per id because posting
    /// insertion is append-if-absent.
    pub fn index_text_fields(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        fields: &[&str],
    ) -> Result<()> {
        for field in fields {
            let Some(Value::String(text)) = document.get(*field) else {
                continue;
            };
            for token in self.analyzer.analyze(text) {
                let key = keys::text_key(collection, &token.text);
                trace!(collection, id, token = %token.text, "indexing token");
                self.append_posting(&self.text_index, &key, id)?;
            }
        }
        Ok(())
    }

    /// Remove a document's tokens from the inverted index.
    ///
    /// The annotation metadata is not persisted, so this re-analyzes every
    /// top-level string field of the stored document (except `_id`). When
    /// the annotation had narrowed the indexed set, unindexed fields simply
    /// remove ids from posting lists they never joined.
    pub fn deindex_text_fields(&self, collection: &str, id: &str, document: &Document) -> Result<()> {
        for (field, value) in document {
            if field == ID_FIELD {
                continue;
            }
            let Value::String(text) = value else {
                continue;
            };
            for token in self.analyzer.analyze(text) {
                let key = keys::text_key(collection, &token.text);
                trace!(collection, id, token = %token.text, "removing token");
                self.remove_posting(&self.text_index, &key, id)?;
            }
        }
        Ok(())
    }

    /// Ids posted under a path-value key, in list order. Empty when absent.
    pub fn secondary_postings(
        &self,
        collection: &str,
        path: &str,
        value: &str,
    ) -> Result<Vec<String>> {
        self.postings(&self.index, &keys::index_key(collection, path, value))
    }

    /// Ids posted under a token key, in list order. Empty when absent.
    pub fn token_postings(&self, collection: &str, token: &str) -> Result<Vec<String>> {
        self.postings(&self.text_index, &keys::text_key(collection, token))
    }

    fn postings(&self, kv: &KvStore, key: &[u8]) -> Result<Vec<String>> {
        Ok(match kv.get(key)? {
            Some(bytes) => PostingList::decode(&bytes).into_ids(),
            None => Vec::new(),
        })
    }

    fn append_posting(&self, kv: &KvStore, key: &[u8], id: &str) -> Result<()> {
        let mut list = match kv.get(key)? {
            Some(bytes) => PostingList::decode(&bytes),
            None => PostingList::new(),
        };
        if list.insert(id) {
            kv.put(key, &list.encode())?;
        }
        Ok(())
    }

    fn remove_posting(&self, kv: &KvStore, key: &[u8], id: &str) -> Result<()> {
        let Some(bytes) = kv.get(key)? else {
            return Ok(());
        };
        let mut list = PostingList::decode(&bytes);
        if !list.remove(id) {
            return Ok(());
        }
        if list.is_empty() {
            kv.delete(key)
        } else {
            kv.put(key, &list.encode())
        }
    }
}
