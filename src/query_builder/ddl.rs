use crate::dialect::Dialect;
use crate::schema::{FieldDescriptor, ForeignKey};

/// `name type` fragments for each field, in declaration order.
#[must_use]
pub fn column_defs(dialect: &dyn Dialect, fields: &[FieldDescriptor]) -> Vec<String> {
    fields
        .iter()
        .map(|f| {
            format!(
                "{} {}",
                f.name,
                dialect.column(f.column_type, f.nullable, f.auto_increment, f.unique)
            )
        })
        .collect()
}

fn references(fk: &ForeignKey) -> String {
    let on_delete = if fk.on_delete_cascade {
        " ON DELETE CASCADE"
    } else {
        ""
    };
    let on_update = if fk.on_update_cascade {
        " ON UPDATE CASCADE"
    } else {
        ""
    };
    format!(
        "FOREIGN KEY ({}) REFERENCES {}({}){on_delete}{on_update}",
        fk.column, fk.ref_table, fk.ref_column
    )
}

/// `CREATE TABLE IF NOT EXISTS name (defs[, PRIMARY KEY (pk)][, FOREIGN KEY ...]);`
#[must_use]
pub fn create_table(
    name: &str,
    column_defs: &[String],
    primary_key: Option<&str>,
    foreign_key: Option<&ForeignKey>,
) -> String {
    let primary = primary_key
        .map(|pk| format!(", PRIMARY KEY ({pk})"))
        .unwrap_or_default();
    let foreign = foreign_key
        .map(|fk| format!(", {}", references(fk)))
        .unwrap_or_default();
    format!(
        "CREATE TABLE IF NOT EXISTS {name} ({}{primary}{foreign});",
        column_defs.join(",")
    )
}

/// `ALTER TABLE table ADD FOREIGN KEY ...;`
#[must_use]
pub fn add_foreign_key(table: &str, foreign_key: &ForeignKey) -> String {
    format!("ALTER TABLE {table} ADD {};", references(foreign_key))
}

#[must_use]
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table};")
}

#[must_use]
pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {name};")
}

#[must_use]
pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {name};")
}
