//! Update diff engine: turns a record's current values into `SET` assignments and the
//! `WHERE` predicate of an `UPDATE`.
//!
//! When no condition is supplied, the first assignment is taken off the `SET` list and
//! used as the `WHERE` predicate. For a record `{id, name, price}` with primary key `id`
//! that means `UPDATE t SET price = '5' WHERE name = 'a';`. Callers that identify rows by
//! any other column must pass the condition explicitly.

use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::query_builder::assignment;
use crate::types::{FieldValue, RowValues};

/// Assignments and predicate for one `UPDATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDiff {
    pub assignments: Vec<String>,
    pub condition: String,
}

/// Compute the diff for `values`.
///
/// * The primary-key field never appears among the assignments, nor do generated fields.
/// * With `previous`, only fields whose value differs from the value recorded there for
///   the same column are assigned; fields absent from `previous` count as changed.
/// * Without `condition`, the first remaining assignment becomes the predicate.
///
/// # Errors
/// Returns `SimpleSqlError::ExecutionError` when nothing is left to assign, or a codec
/// error for unserializable lists/maps.
pub fn diff(
    dialect: &dyn Dialect,
    values: &[(&str, FieldValue)],
    primary_key: Option<&str>,
    condition: Option<&str>,
    previous: Option<&[(&str, RowValues)]>,
) -> Result<UpdateDiff, SimpleSqlError> {
    let mut assignments = Vec::with_capacity(values.len());
    for (column, value) in values {
        if Some(*column) == primary_key {
            continue;
        }
        let FieldValue::Value(current) = value else {
            continue;
        };
        if let Some(previous) = previous {
            let unchanged = previous
                .iter()
                .any(|(name, old)| name == column && old == current);
            if unchanged {
                continue;
            }
        }
        assignments.push(assignment(column, current, dialect)?);
    }

    let condition = match condition.filter(|c| !c.is_empty()) {
        Some(c) => c.to_string(),
        None => {
            if assignments.is_empty() {
                return Err(SimpleSqlError::ExecutionError(
                    "update has no field to use as condition".into(),
                ));
            }
            assignments.remove(0)
        }
    };

    if assignments.is_empty() {
        return Err(SimpleSqlError::ExecutionError(
            "update has no columns left to SET".into(),
        ));
    }

    Ok(UpdateDiff {
        assignments,
        condition,
    })
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::query_builder::update;
    use crate::sqlite::SqliteDialect;
    use serde_json::json;

    fn product() -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::of(1)),
            ("name", FieldValue::of("a")),
            ("price", FieldValue::of(5)),
        ]
    }

    #[test]
    fn first_non_key_field_becomes_the_condition() {
        let d = diff(&SqliteDialect, &product(), Some("id"), None, None).unwrap();
        assert_eq!(d.condition, "name = 'a'");
        assert_eq!(d.assignments, vec!["price = '5'"]);
        assert_eq!(
            update("Product", &d),
            "UPDATE Product SET price = '5' WHERE name = 'a';"
        );
    }

    #[test]
    fn primary_key_never_assigned() {
        for pk in ["id", "name", "price"] {
            let d = diff(&SqliteDialect, &product(), Some(pk), Some("1 = 1"), None).unwrap();
            assert!(
                d.assignments.iter().all(|a| !a.starts_with(&format!("{pk} ="))),
                "{pk} leaked into {:?}",
                d.assignments
            );
        }
    }

    #[test]
    fn explicit_condition_keeps_all_assignments_in_order() {
        let d = diff(&SqliteDialect, &product(), Some("id"), Some("id = '1'"), None).unwrap();
        assert_eq!(d.condition, "id = '1'");
        assert_eq!(d.assignments, vec!["name = 'a'", "price = '5'"]);
    }

    #[test]
    fn compound_values_are_encoded() {
        let values = vec![
            ("id", FieldValue::of(1)),
            ("products", FieldValue::of(vec![json!("water")])),
        ];
        let d = diff(&SqliteDialect, &values, Some("id"), Some("id = '1'"), None).unwrap();
        assert_eq!(d.assignments, vec![r#"products = '{"list": ["water"]}'"#]);
    }

    #[test]
    fn previous_values_filter_unchanged_fields() {
        let previous = vec![
            ("name", RowValues::Text("a".into())),
            ("price", RowValues::Int(4)),
        ];
        let d = diff(
            &SqliteDialect,
            &product(),
            Some("id"),
            Some("id = '1'"),
            Some(previous.as_slice()),
        )
        .unwrap();
        assert_eq!(d.assignments, vec!["price = '5'"]);
    }

    #[test]
    fn nothing_to_set_is_an_error() {
        let only_key = vec![("id", FieldValue::of(1))];
        assert!(diff(&SqliteDialect, &only_key, Some("id"), None, None).is_err());
        let one_field = vec![("id", FieldValue::of(1)), ("name", FieldValue::of("a"))];
        assert!(diff(&SqliteDialect, &one_field, Some("id"), None, None).is_err());
    }
}
