use serde_json::Value;

use crate::core::types::{render_value, Document};
use crate::query::ast::{Comparison, Condition, FieldPath, Group, Query};

/// Check whether a document satisfies a query: every top-level group must
/// hold. An empty query matches everything.
///
/// Equality and inequality compare the string renderings of both sides,
/// the same renderings the path-value index was built from, so `"25"`
/// equals `25`. The ordering operators compare as doubles instead; a side
/// that cannot be coerced makes the condition false, never an error.
pub fn matches(document: &Document, query: &Query) -> bool {
    query.groups.iter().all(|group| group_matches(document, group))
}

fn group_matches(document: &Document, group: &Group) -> bool {
    match group {
        Group::And(conditions) => conditions
            .iter()
            .all(|condition| condition_matches(document, condition)),
        Group::Or(conditions) => conditions
            .iter()
            .any(|condition| condition_matches(document, condition)),
    }
}

fn condition_matches(document: &Document, condition: &Condition) -> bool {
    let Some(value) = resolve_path(document, &condition.path) else {
        return false;
    };

    match condition.operator {
        Comparison::Eq => render_value(value) == render_value(&condition.value),
        Comparison::Ne => render_value(value) != render_value(&condition.value),
        Comparison::Gt | Comparison::Gte | Comparison::Lt | Comparison::Lte => {
            let (Some(left), Some(right)) = (coerce_f64(value), coerce_f64(&condition.value))
            else {
                return false;
            };
            match condition.operator {
                Comparison::Gt => left > right,
                Comparison::Gte => left >= right,
                Comparison::Lt => left < right,
                Comparison::Lte => left <= right,
                _ => unreachable!(),
            }
        }
    }
}

/// Resolve a dotted path by successive object lookup. Any missing segment
/// or non-object intermediate makes the resolution fail.
pub fn resolve_path<'a>(document: &'a Document, path: &FieldPath) -> Option<&'a Value> {
    let mut segments = path.segments().iter();
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Numeric coercion for the ordering operators: numbers pass through,
/// strings are parsed, everything else fails.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
