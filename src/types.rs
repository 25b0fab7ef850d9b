use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde_json::{Map, Value as JsonValue};

/// Values that can be stored in a column or read back from one.
///
/// `List` and `Map` never reach the database raw: they are wrapped in the tagged
/// envelope (see [`crate::codec`]) and stored as text.
/// ```rust
/// use simplesql::prelude::*;
///
/// let values = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::List(vec![serde_json::json!("milk")]),
/// ];
/// # let _ = values;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Ordered sequence, stored as a `{"list": ...}` envelope
    List(Vec<JsonValue>),
    /// Key/value map, stored as a `{"dict": ...}` envelope
    Map(Map<String, JsonValue>),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let RowValues::Bool(value) = self {
            return Some(*value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(true);
            } else if *i == 0 {
                return Some(false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[JsonValue]> {
        if let RowValues::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Map<String, JsonValue>> {
        if let RowValues::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<Vec<JsonValue>> for RowValues {
    fn from(value: Vec<JsonValue>) -> Self {
        RowValues::List(value)
    }
}

impl From<Map<String, JsonValue>> for RowValues {
    fn from(value: Map<String, JsonValue>) -> Self {
        RowValues::Map(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The value a record hands over for one of its fields.
///
/// `Generated` asks the backend to assign the column (auto-increment); the column is
/// left out of the INSERT entirely rather than sent as NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Generated,
    Value(RowValues),
}

impl FieldValue {
    /// `Generated` when `id` is `None`, the explicit id otherwise.
    #[must_use]
    pub fn auto(id: Option<i64>) -> Self {
        id.map_or(FieldValue::Generated, |v| FieldValue::Value(RowValues::Int(v)))
    }

    /// Wrap anything convertible into [`RowValues`].
    pub fn of(value: impl Into<RowValues>) -> Self {
        FieldValue::Value(value.into())
    }

    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, FieldValue::Generated)
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&RowValues> {
        match self {
            FieldValue::Generated => None,
            FieldValue::Value(v) => Some(v),
        }
    }
}

impl From<RowValues> for FieldValue {
    fn from(value: RowValues) -> Self {
        FieldValue::Value(value)
    }
}

/// The database backends supported by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseType {
    /// `PostgreSQL` (client/server)
    #[cfg(feature = "postgres")]
    Postgres,
    /// `SQLite` (embedded, one file per database)
    #[cfg(feature = "sqlite")]
    Sqlite,
}
