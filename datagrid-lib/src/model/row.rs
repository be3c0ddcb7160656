//! Dynamic list rows

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Field holding a row's identity.
pub const ID_FIELD: &str = "id";

/// Identity of a row, used for selection.
///
/// Backends key rows by either an integer or a string (e.g. a UUID); both
/// are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Numeric identity.
    Int(i64),
    /// String identity.
    Str(String),
}

impl RowId {
    /// Reads an identity from a JSON value.
    ///
    /// Returns `None` for anything that is neither an integer nor a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RowId {
    fn from(id: i32) -> Self {
        Self::Int(id.into())
    }
}

impl From<u32> for RowId {
    fn from(id: u32) -> Self {
        Self::Int(id.into())
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Int(id) => Value::from(id),
            RowId::Str(id) => Value::String(id),
        }
    }
}

/// One record of a list page.
///
/// Rows are opaque JSON objects; only the `id` field has a meaning to the
/// store. Everything else is resource defined and handed to the view as-is.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Row, RowId};
///
/// let row = Row::with_id(7).set("title", "Homepage");
///
/// assert_eq!(row.id(), Some(RowId::Int(7)));
/// assert_eq!(row.get_str("title"), Some("Homepage"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row holding only its identity.
    pub fn with_id(id: impl Into<RowId>) -> Self {
        Self::new().set(ID_FIELD, id.into())
    }

    /// Sets a field, returning the row for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns the row identity, if the row has a usable `id` field.
    pub fn id(&self) -> Option<RowId> {
        self.fields.get(ID_FIELD).and_then(RowId::from_value)
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as a string slice, if it is a JSON string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns the field as an integer, if it is a JSON integer.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    /// Returns `true` if the row has the field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the row and returns its fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
