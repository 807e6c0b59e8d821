//! Embedded JSON document database.
//!
//! Documents live in named collections inside an ordered key-value engine.
//! Two auxiliary keyspaces keep them queryable: a path-value index for
//! structured boolean filters and an inverted token index for full-text
//! search over annotated fields.

pub mod analysis;
pub mod core;
pub mod index;
pub mod query;
pub mod storage;

pub use crate::core::config::Config;
pub use crate::core::database::{Database, FindOptions};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{from_document, to_document, Document, TextIndexed};
pub use crate::query::ast::{Comparison, Condition, FieldPath, Group, Query};
