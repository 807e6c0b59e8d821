use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind, Result};

/// A stored record: an unordered map from field names to JSON values.
///
/// Every persisted document carries a reserved `_id` string field assigned
/// at insert time.
pub type Document = serde_json::Map<String, Value>;

/// The reserved id field injected into every document.
pub const ID_FIELD: &str = "_id";

/// Declares which fields of a record feed the inverted text index.
///
/// Implement this on any type passed to `Database::insert_one`. The listed
/// names must match the serialized field names; fields whose values are not
/// strings are ignored. The default marks nothing.
///
/// ```
/// use cairndb::TextIndexed;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Restaurant {
///     name: String,
///     cuisine: String,
/// }
///
/// impl TextIndexed for Restaurant {
///     fn text_index_fields() -> &'static [&'static str] {
///         &["name", "cuisine"]
///     }
/// }
/// ```
pub trait TextIndexed {
    fn text_index_fields() -> &'static [&'static str] {
        &[]
    }
}

/// Serialize a record into a document map.
///
/// The record must serialize to a JSON object; anything else is rejected.
pub fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::new(
            ErrorKind::InvalidArgument,
            format!("record must serialize to an object, got {}", kind_of(&other)),
        )),
    }
}

/// Deserialize a document map back into a user type.
pub fn from_document<T: DeserializeOwned>(document: &Document) -> Result<T> {
    serde_json::from_value(Value::Object(document.clone())).map_err(Error::from)
}

/// Canonical value-to-string conversion shared by the path-value index and
/// the equality matcher. The two must agree: index keys are built from this
/// rendering at insert time and compared against it at query time.
///
/// Scalars render bare (strings as themselves, booleans as `true`/`false`,
/// null as `null`, numbers in plain decimal). Integral floats of typical
/// magnitude drop the fractional part so `30.0` and `30` collide, matching
/// the index. Arrays and objects, reachable only through the matcher, render
/// as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if n.as_i64().is_some() || n.as_u64().is_some() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
