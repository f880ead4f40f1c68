//! Field values carried by a record.
//!
//! Values are untyped: anything `serde_json::Value` can hold (null, booleans,
//! numbers, strings, sequences, nested mappings). The field mapping keeps
//! insertion order so that a load after a commit reproduces the same document.

pub use serde_json::Value;

/// Ordered mapping from field name to value.
pub type Fields = serde_json::Map<String, Value>;

/// Shared absent marker, returned by indexing a record with an unset name.
pub static NULL: Value = Value::Null;

/// Build a `Fields` mapping from name/value pairs, keeping their order.
///
/// # Examples
///
/// ```
/// use pstruct::{Value, fields_from};
///
/// let fields = fields_from([("foo", Value::from("bar")), ("baz", Value::from(42))]);
/// assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["foo", "baz"]);
/// ```
pub fn fields_from<K, V, I>(pairs: I) -> Fields
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}

/// Short human-readable rendering of a value, used by `Display` for records.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
