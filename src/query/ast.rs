use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dotted field path, pre-split into segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPath {
    dotted: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(dotted: impl Into<String>) -> Self {
        let dotted = dotted.into();
        let segments = dotted.split('.').map(String::from).collect();
        FieldPath { dotted, segments }
    }

    pub fn dotted(&self) -> &str {
        &self.dotted
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        FieldPath::new(dotted)
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        FieldPath::new(dotted)
    }
}

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// One `path <op> value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub path: FieldPath,
    pub operator: Comparison,
    pub value: Value,
}

impl Condition {
    pub fn new(path: impl Into<FieldPath>, operator: Comparison, value: impl Into<Value>) -> Self {
        Condition {
            path: path.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Eq, value)
    }

    pub fn ne(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Ne, value)
    }

    pub fn gt(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Gt, value)
    }

    pub fn gte(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Gte, value)
    }

    pub fn lt(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Lt, value)
    }

    pub fn lte(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Condition::new(path, Comparison::Lte, value)
    }
}

/// One top-level group of conditions. Groups do not nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Group {
    /// Every condition must hold.
    And(Vec<Condition>),
    /// At least one condition must hold.
    Or(Vec<Condition>),
}

impl Group {
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Group::And(conditions) | Group::Or(conditions) => conditions,
        }
    }
}

/// An ordered sequence of groups, implicitly AND-combined.
///
/// ```
/// use cairndb::{Condition, Query};
///
/// // (name = "Jane" OR name = "John") AND age > 20 AND age < 40
/// let query = Query::new()
///     .or(vec![
///         Condition::eq("name", "Jane"),
///         Condition::eq("name", "John"),
///     ])
///     .and(vec![Condition::gt("age", 20), Condition::lt("age", 40)]);
/// assert_eq!(query.groups.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub groups: Vec<Group>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn and(mut self, conditions: Vec<Condition>) -> Self {
        self.groups.push(Group::And(conditions));
        self
    }

    pub fn or(mut self, conditions: Vec<Condition>) -> Self {
        self.groups.push(Group::Or(conditions));
        self
    }

    /// An empty query matches every document.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
