use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SimpleSqlError;
use crate::schema::FromRowValue;
use crate::types::RowValues;

/// A row from a database query result
///
/// Column names are shared across all rows of a result set. Values are already decoded:
/// tagged text columns arrive here as `List`/`Map`.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_cache(
        column_names: Arc<Vec<String>>,
        rows: Vec<RowValues>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            rows,
            column_index_cache,
        }
    }

    /// Get the index of a column by name.
    ///
    /// Falls back to a case-insensitive match, since `PostgreSQL` folds unquoted
    /// identifiers to lower case.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names
            .iter()
            .position(|col| col.eq_ignore_ascii_case(column_name))
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Typed access for `Record::from_row` implementations.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::DecodeError` if the column is missing or cannot be
    /// converted to `T`.
    pub fn value<T: FromRowValue>(&self, column_name: &str) -> Result<T, SimpleSqlError> {
        let raw = self.get(column_name).ok_or_else(|| {
            SimpleSqlError::DecodeError(format!("column '{column_name}' not in result"))
        })?;
        T::from_row_value(raw).ok_or_else(|| {
            SimpleSqlError::DecodeError(format!(
                "column '{column_name}' holds {raw:?}, which does not fit {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter())
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}
