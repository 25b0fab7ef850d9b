use rusqlite::types::Value;

use crate::error::SimpleSqlError;
use crate::results::{ResultSet, pack};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SimpleSqlError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SimpleSqlError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a query on a raw connection and pack the rows.
///
/// # Errors
/// Returns `SimpleSqlError::SqliteError` if preparing or stepping the statement fails.
pub fn build_result_set(
    conn: &rusqlite::Connection,
    sql: &str,
) -> Result<ResultSet, SimpleSqlError> {
    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut raw_rows = Vec::new();
    let mut rows_iter = stmt.query([])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        raw_rows.push(row_values);
    }

    Ok(pack(column_names, raw_rows))
}
