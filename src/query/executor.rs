use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{render_value, Document};
use crate::index::manager::IndexManager;
use crate::query::ast::{Comparison, Group, Query};
use crate::query::matcher;
use crate::query::planner::{self, QueryPlan};
use crate::storage::keys;
use crate::storage::kv::KvStore;

/// Evaluates queries against the primary keyspace, using posting lists
/// where the planner allows and falling back to a collection scan.
pub struct QueryExecutor {
    store: Arc<KvStore>,
    manager: IndexManager,
}

impl QueryExecutor {
    pub fn new(store: Arc<KvStore>, manager: IndexManager) -> Self {
        QueryExecutor { store, manager }
    }

    /// Evaluate a query and return up to `limit` matching documents
    /// (`limit == 0` means unbounded).
    pub fn find_many(&self, collection: &str, query: &Query, limit: usize) -> Result<Vec<Document>> {
        match planner::plan(query) {
            QueryPlan::IndexAssisted => self.find_by_index(collection, query, limit),
            QueryPlan::FullScan => self.scan_collection(collection, query, limit),
        }
    }

    /// Index-assisted evaluation.
    ///
    /// Top-level groups are implicitly ANDed, so an id qualifies when it was
    /// counted once per required contribution: each OR group contributes one
    /// (an id in the union of its branches counts once no matter how many
    /// branches it matched), and each `=` condition of an AND group
    /// contributes one. Non-`=` conditions contribute nothing here.
    ///
    /// Every candidate is then re-verified against the whole query. That
    /// screens out path-value collisions from the lossy value rendering,
    /// the deferred non-`=` conditions, and ids whose document vanished
    /// after the posting lists were read.
    fn find_by_index(&self, collection: &str, query: &Query, limit: usize) -> Result<Vec<Document>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut required = 0usize;

        for group in &query.groups {
            match group {
                Group::Or(conditions) => {
                    required += 1;
                    let mut union: BTreeSet<String> = BTreeSet::new();
                    for condition in conditions {
                        let ids = self.manager.secondary_postings(
                            collection,
                            condition.path.dotted(),
                            &render_value(&condition.value),
                        )?;
                        union.extend(ids);
                    }
                    for id in union {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                Group::And(conditions) => {
                    for condition in conditions {
                        if condition.operator != Comparison::Eq {
                            continue;
                        }
                        required += 1;
                        let ids = self.manager.secondary_postings(
                            collection,
                            condition.path.dotted(),
                            &render_value(&condition.value),
                        )?;
                        for id in ids {
                            *counts.entry(id).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        let mut documents = Vec::new();
        for (id, count) in &counts {
            if *count != required {
                continue;
            }
            // A stale posting may outlive its document; skip it.
            let Some(document) = self.load(collection, id)? else {
                continue;
            };
            if matcher::matches(&document, query) {
                documents.push(document);
                if limit > 0 && documents.len() >= limit {
                    break;
                }
            }
        }
        Ok(documents)
    }

    /// Linear scan of the collection's primary keyspace in key order.
    fn scan_collection(&self, collection: &str, query: &Query, limit: usize) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for entry in self.store.iter() {
            let (key, value) = entry?;
            if keys::collection_of(&key) != Some(collection) {
                continue;
            }
            let document: Document = serde_json::from_slice(&value)?;
            if matcher::matches(&document, query) {
                documents.push(document);
                if limit > 0 && documents.len() >= limit {
                    break;
                }
            }
        }
        Ok(documents)
    }

    /// Full-text search: analyze the text, intersect the posting lists of
    /// the resulting tokens in order, and load the surviving documents.
    ///
    /// A token with no posting list is skipped rather than emptying the
    /// intersection, so a mix of known and unknown tokens still matches on
    /// the known ones. Result order follows the first token's posting list.
    pub fn search(&self, collection: &str, text: &str) -> Result<Vec<Document>> {
        let tokens = self.manager.analyzer().analyze(text);

        let mut matched: Vec<String> = Vec::new();
        let mut seeded = false;
        for token in &tokens {
            let ids = self.manager.token_postings(collection, &token.text)?;
            if ids.is_empty() {
                continue;
            }
            if !seeded {
                matched = ids;
                seeded = true;
            } else {
                let keep: HashSet<String> = ids.into_iter().collect();
                matched.retain(|id| keep.contains(id));
            }
        }

        let mut documents = Vec::with_capacity(matched.len());
        for id in &matched {
            let document = self.load(collection, id)?.ok_or_else(|| {
                Error::new(ErrorKind::DocumentNotExists, format!("{collection}:{id}"))
            })?;
            documents.push(document);
        }
        Ok(documents)
    }

    fn load(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        match self.store.get(&keys::doc_key(collection, id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
