use super::{assignment, literal};
use crate::diff::UpdateDiff;
use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::types::{FieldValue, RowValues};

/// `INSERT INTO table (cols) VALUES (vals);`
///
/// Generated fields are removed from the column list and the value list together, so
/// the remaining columns and values stay aligned. A record with nothing but generated
/// fields inserts `DEFAULT VALUES`.
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if a list or map value cannot be serialized.
pub fn insert(
    dialect: &dyn Dialect,
    table: &str,
    values: &[(&str, FieldValue)],
) -> Result<String, SimpleSqlError> {
    let mut columns = Vec::with_capacity(values.len());
    let mut literals = Vec::with_capacity(values.len());
    for (column, value) in values {
        if let FieldValue::Value(v) = value {
            columns.push(*column);
            literals.push(literal(v, dialect)?);
        }
    }
    if columns.is_empty() {
        return Ok(format!("INSERT INTO {table} DEFAULT VALUES;"));
    }
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({});",
        columns.join(","),
        literals.join(",")
    ))
}

/// `UPDATE table SET assignments WHERE condition;`
#[must_use]
pub fn update(table: &str, diff: &UpdateDiff) -> String {
    format!(
        "UPDATE {table} SET {} WHERE {};",
        diff.assignments.join(","),
        diff.condition
    )
}

/// `DELETE FROM table WHERE column = value;`
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if a list or map value cannot be serialized.
pub fn delete_by(
    dialect: &dyn Dialect,
    table: &str,
    column: &str,
    value: &RowValues,
) -> Result<String, SimpleSqlError> {
    Ok(delete_where(table, &assignment(column, value, dialect)?))
}

/// `DELETE FROM table WHERE predicate;`
#[must_use]
pub fn delete_where(table: &str, predicate: &str) -> String {
    format!("DELETE FROM {table} WHERE {predicate};")
}

/// Delete rows equal to every non-generated field of `values` (`IS NULL` for nulls).
///
/// # Errors
/// Returns `SimpleSqlError::ExecutionError` when no field can be compared, or a codec error.
pub fn delete_matching(
    dialect: &dyn Dialect,
    table: &str,
    values: &[(&str, FieldValue)],
) -> Result<String, SimpleSqlError> {
    let mut predicates = Vec::with_capacity(values.len());
    for (column, value) in values {
        match value {
            FieldValue::Generated => {}
            FieldValue::Value(RowValues::Null) => predicates.push(format!("{column} IS NULL")),
            FieldValue::Value(v) => predicates.push(assignment(column, v, dialect)?),
        }
    }
    if predicates.is_empty() {
        return Err(SimpleSqlError::ExecutionError(format!(
            "cannot delete from {table}: record has no comparable fields"
        )));
    }
    Ok(delete_where(table, &predicates.join(" AND ")))
}
