use crate::dialect::{Dialect, hex};
use crate::error::SimpleSqlError;
use crate::query_builder::quote;
use crate::schema::ColumnType;
use crate::types::DatabaseType;

/// `SQLite` dialect.
///
/// Type names keep their MySQL spelling; `SQLite` maps them through type affinity. An
/// `INTEGER` primary key is an alias for the rowid, so auto-increment needs no keyword and
/// the keyword is never emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn type_name(&self, column_type: ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Char(n) => format!("CHAR({n})"),
            ColumnType::Varchar(n) => format!("VARCHAR({n})"),
            ColumnType::Text(n) => format!("TEXT({n})"),
            ColumnType::LongText => "LONGTEXT".into(),
            ColumnType::Double(p, s) => format!("DOUBLE({p}, {s})"),
            ColumnType::Boolean => "BOOL".into(),
            ColumnType::Binary(n) => format!("VARBINARY({n})"),
            ColumnType::Object(_) => self.type_name(column_type.storage()),
        }
    }

    fn auto_increment_keyword(&self) -> Option<&'static str> {
        None
    }

    fn foreign_key_pragma(&self) -> Option<&'static str> {
        Some("PRAGMA foreign_keys = ON;")
    }

    fn blob_literal(&self, bytes: &[u8]) -> String {
        format!("X'{}'", hex(bytes))
    }

    fn list_databases_statement(&self) -> Option<String> {
        None
    }

    fn alter_auto_increment(&self, _table: &str, _column: &str, _start: i64) -> Option<String> {
        None
    }

    fn backup_statement(
        &self,
        _database: &str,
        filepath: &str,
        differential: bool,
    ) -> Result<String, SimpleSqlError> {
        if differential {
            return Err(SimpleSqlError::Unimplemented(
                "SQLite has no differential backup".into(),
            ));
        }
        Ok(format!("VACUUM INTO {};", quote(filepath)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_render_with_affinity_friendly_names() {
        let d = SqliteDialect;
        assert_eq!(d.type_name(ColumnType::text(20)), "TEXT(20)");
        assert_eq!(d.type_name(ColumnType::object()), "LONGTEXT");
        assert_eq!(d.type_name(ColumnType::object_bounded(200)), "TEXT(200)");
        assert_eq!(d.type_name(ColumnType::double(10, 2)), "DOUBLE(10, 2)");
        assert_eq!(d.type_name(ColumnType::binary(None)), "VARBINARY(100)");
        assert_eq!(d.type_name(ColumnType::char(3)), "CHAR(3)");
        assert_eq!(d.type_name(ColumnType::boolean()), "BOOL");
    }

    #[test]
    fn auto_increment_is_never_emitted() {
        let d = SqliteDialect;
        assert_eq!(
            d.column(ColumnType::integer(), false, true, false),
            "INTEGER NOT NULL"
        );
        assert_eq!(d.alter_auto_increment("t", "id", 100), None);
    }

    #[test]
    fn backup_uses_vacuum_into() {
        let d = SqliteDialect;
        assert_eq!(
            d.backup_statement("orders", "/tmp/o.db", false).unwrap(),
            "VACUUM INTO '/tmp/o.db';"
        );
        assert!(matches!(
            d.backup_statement("orders", "/tmp/o.db", true),
            Err(SimpleSqlError::Unimplemented(_))
        ));
    }
}
