use serde_json::Value;

use crate::core::types::{render_value, Document, ID_FIELD};

/// Derive the path-value pairs of a document: one `(dottedPath, rendering)`
/// per scalar leaf reachable from the root.
///
/// Nested objects contribute their children under a dotted prefix. Arrays
/// contribute nothing. The reserved `_id` field is skipped at every level,
/// so no posting list ever exists for it.
pub fn path_values(document: &Document) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    collect(document, "", &mut pairs);
    pairs
}

fn collect(object: &Document, prefix: &str, pairs: &mut Vec<(String, String)>) {
    for (key, value) in object {
        if key == ID_FIELD {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(child) => collect(child, &path, pairs),
            Value::Array(_) => {}
            scalar => pairs.push((path, render_value(scalar))),
        }
    }
}
