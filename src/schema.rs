//! Static description of records: columns, keys and the [`Record`] contract.

use chrono::NaiveDateTime;
use serde_json::{Map, Value as JsonValue};

use crate::error::SimpleSqlError;
use crate::results::CustomDbRow;
use crate::types::{FieldValue, RowValues};

/// Base column types. Each dialect renders them to its own spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    /// Fixed-length character column
    Char(u32),
    /// Bounded string
    Varchar(u32),
    /// Bounded text
    Text(u32),
    /// Unbounded text
    LongText,
    /// Double with precision and scale
    Double(u32, u32),
    Boolean,
    /// Variable-length binary with a maximum length
    Binary(u32),
    /// Text column hosting tagged list/map payloads; bounded when a size is given
    Object(Option<u32>),
}

impl ColumnType {
    #[must_use]
    pub fn integer() -> Self {
        ColumnType::Integer
    }

    #[must_use]
    pub fn char(size: u32) -> Self {
        ColumnType::Char(size)
    }

    #[must_use]
    pub fn varchar(size: u32) -> Self {
        ColumnType::Varchar(size)
    }

    #[must_use]
    pub fn text(size: u32) -> Self {
        ColumnType::Text(size)
    }

    #[must_use]
    pub fn long_text() -> Self {
        ColumnType::LongText
    }

    #[must_use]
    pub fn double(precision: u32, scale: u32) -> Self {
        ColumnType::Double(precision, scale)
    }

    #[must_use]
    pub fn boolean() -> Self {
        ColumnType::Boolean
    }

    /// Binary column, 100 bytes unless told otherwise.
    #[must_use]
    pub fn binary(max: Option<u32>) -> Self {
        ColumnType::Binary(max.unwrap_or(100))
    }

    #[must_use]
    pub fn object() -> Self {
        ColumnType::Object(None)
    }

    #[must_use]
    pub fn object_bounded(max_size: u32) -> Self {
        ColumnType::Object(Some(max_size))
    }

    /// Objects are plain text columns once rendered.
    #[must_use]
    pub fn storage(self) -> Self {
        match self {
            ColumnType::Object(Some(size)) => ColumnType::Text(size),
            ColumnType::Object(None) => ColumnType::LongText,
            other => other,
        }
    }
}

/// Metadata about one field of a record, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name; also the column name
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            unique: false,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Table-level foreign key: `FOREIGN KEY (column) REFERENCES ref_table(ref_column)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
    pub on_delete_cascade: bool,
    pub on_update_cascade: bool,
}

impl ForeignKey {
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
            on_delete_cascade: false,
            on_update_cascade: false,
        }
    }

    #[must_use]
    pub fn on_delete_cascade(mut self) -> Self {
        self.on_delete_cascade = true;
        self
    }

    #[must_use]
    pub fn on_update_cascade(mut self) -> Self {
        self.on_update_cascade = true;
        self
    }
}

/// Extra table options used by `create_table`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub foreign_key: Option<ForeignKey>,
    /// Start value for the auto-increment column, where the dialect can alter it
    pub auto_increment_start: Option<i64>,
}

impl TableOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_key = Some(fk);
        self
    }

    #[must_use]
    pub fn auto_increment_start(mut self, start: i64) -> Self {
        self.auto_increment_start = Some(start);
        self
    }
}

/// An application type stored one-to-one in a table.
///
/// `values` must list the same fields as `fields`, in the same order; that order drives
/// column order in every generated statement.
pub trait Record: Sized {
    fn table_name() -> &'static str;

    fn fields() -> Vec<FieldDescriptor>;

    fn values(&self) -> Vec<(&'static str, FieldValue)>;

    /// Rebuild a record from a packed result row.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::DecodeError` when a column is missing or has the wrong shape.
    fn from_row(row: &CustomDbRow) -> Result<Self, SimpleSqlError>;

    /// Name of the first field flagged as primary key.
    fn primary_key() -> Option<&'static str> {
        Self::fields()
            .into_iter()
            .find(|f| f.primary_key)
            .map(|f| f.name)
    }
}

/// Conversion from a decoded column value into a typed record field.
pub trait FromRowValue: Sized {
    fn from_row_value(value: &RowValues) -> Option<Self>;
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Int(i) => Some(*i),
            RowValues::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromRowValue for i32 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        i64::from_row_value(value).and_then(|i| i32::try_from(i).ok())
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Text(s) => s.trim().parse().ok(),
            other => other.as_float(),
        }
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Text(s) => match s.as_str() {
                "1" | "true" | "t" => Some(true),
                "0" | "false" | "f" => Some(false),
                _ => None,
            },
            other => other.as_bool(),
        }
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        match value {
            RowValues::Text(s) => Some(s.clone()),
            RowValues::Int(i) => Some(i.to_string()),
            RowValues::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

impl FromRowValue for Vec<JsonValue> {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_list().map(<[JsonValue]>::to_vec)
    }
}

impl FromRowValue for Map<String, JsonValue> {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_map().cloned()
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_blob().map(<[u8]>::to_vec)
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        value.as_timestamp()
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}
