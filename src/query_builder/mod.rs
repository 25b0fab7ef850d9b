//! Statement builder.
//!
//! Every function here returns one complete SQL statement as text. Values are rendered as
//! literals (see [`literal`]) and interpolated; nothing is bound as a parameter, so callers
//! must not pass untrusted identifiers or conditions.

mod ddl;
mod dml;
mod select;

pub use ddl::{
    add_foreign_key, column_defs, create_database, create_table, drop_database, drop_table,
};
pub use dml::{delete_by, delete_matching, delete_where, insert, update};
pub use select::SelectQuery;

use crate::codec;
use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::types::RowValues;

/// Render a value as a SQL literal.
///
/// `Null` becomes `null`, booleans `'1'`/`'0'`, blobs use the dialect's binary literal, and
/// everything else is single-quoted text (lists and maps as their tagged envelope).
///
/// # Errors
/// Returns `SimpleSqlError::CodecError` if a list or map cannot be serialized.
pub fn literal(value: &RowValues, dialect: &dyn Dialect) -> Result<String, SimpleSqlError> {
    Ok(match value {
        RowValues::Null => "null".to_string(),
        RowValues::Bool(b) => if *b { "'1'" } else { "'0'" }.to_string(),
        RowValues::Blob(bytes) => dialect.blob_literal(bytes),
        RowValues::Int(i) => quote(&i.to_string()),
        RowValues::Float(f) => quote(&f.to_string()),
        RowValues::Text(s) => quote(s),
        RowValues::Timestamp(dt) => quote(&dt.format("%F %T%.f").to_string()),
        RowValues::List(_) | RowValues::Map(_) => match codec::encode(value)? {
            RowValues::Text(envelope) => quote(&envelope),
            other => return literal(&other, dialect),
        },
    })
}

/// `column = literal`, the unit shared by SET lists and equality filters.
///
/// # Errors
/// Propagates [`literal`] errors.
pub fn assignment(
    column: &str,
    value: &RowValues,
    dialect: &dyn Dialect,
) -> Result<String, SimpleSqlError> {
    Ok(format!("{column} = {}", literal(value, dialect)?))
}

pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// `BACKUP DATABASE <db> TO DISK = '<path>'[ WITH DIFFERENTIAL];`
#[must_use]
pub fn backup(database: &str, filepath: &str, differential: bool) -> String {
    let diff = if differential {
        " WITH DIFFERENTIAL"
    } else {
        ""
    };
    format!("BACKUP DATABASE {database} TO DISK = '{filepath}'{diff};")
}
