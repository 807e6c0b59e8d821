use tracing::debug;

use crate::query::ast::{Comparison, Group, Query};

/// How a query will be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPlan {
    /// Candidate ids come from path-value posting lists and are re-verified
    /// against the full predicate.
    IndexAssisted,
    /// Linear iteration over the collection's primary keyspace.
    FullScan,
}

/// Classify a query. The decision is purely structural, per group:
///
/// - an AND group qualifies when it contains at least one `=` condition
///   (the rest are checked during re-verification);
/// - an OR group qualifies only when every condition is `=` (a single
///   non-`=` branch cannot be answered from the index).
///
/// An empty query, or any group failing its rule, forces a full scan.
pub fn plan(query: &Query) -> QueryPlan {
    let plan = classify(query);
    debug!(?plan, groups = query.groups.len(), "planned query");
    plan
}

fn classify(query: &Query) -> QueryPlan {
    if query.is_empty() {
        return QueryPlan::FullScan;
    }

    for group in &query.groups {
        let eligible = match group {
            Group::And(conditions) => conditions
                .iter()
                .any(|condition| condition.operator == Comparison::Eq),
            Group::Or(conditions) => conditions
                .iter()
                .all(|condition| condition.operator == Comparison::Eq),
        };
        if !eligible {
            return QueryPlan::FullScan;
        }
    }

    QueryPlan::IndexAssisted
}
