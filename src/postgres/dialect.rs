use crate::dialect::{Dialect, hex};
use crate::error::SimpleSqlError;
use crate::query_builder::quote;
use crate::schema::ColumnType;
use crate::types::DatabaseType;

/// `PostgreSQL` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn type_name(&self, column_type: ColumnType) -> String {
        match column_type {
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Char(n) => format!("CHAR({n})"),
            // PostgreSQL TEXT takes no length; a bounded text is a VARCHAR.
            ColumnType::Varchar(n) | ColumnType::Text(n) => format!("VARCHAR({n})"),
            ColumnType::LongText => "TEXT".into(),
            ColumnType::Double(_, _) => "DOUBLE PRECISION".into(),
            ColumnType::Boolean => "BOOLEAN".into(),
            ColumnType::Binary(_) => "BYTEA".into(),
            ColumnType::Object(_) => self.type_name(column_type.storage()),
        }
    }

    fn auto_increment_keyword(&self) -> Option<&'static str> {
        Some("GENERATED BY DEFAULT AS IDENTITY")
    }

    fn foreign_key_pragma(&self) -> Option<&'static str> {
        None
    }

    fn blob_literal(&self, bytes: &[u8]) -> String {
        quote(&format!("\\x{}", hex(bytes)))
    }

    fn list_databases_statement(&self) -> Option<String> {
        Some("SELECT datname FROM pg_database WHERE datistemplate = false;".into())
    }

    fn alter_auto_increment(&self, table: &str, column: &str, start: i64) -> Option<String> {
        Some(format!(
            "ALTER TABLE {table} ALTER COLUMN {column} RESTART WITH {start};"
        ))
    }

    fn backup_statement(
        &self,
        database: &str,
        _filepath: &str,
        _differential: bool,
    ) -> Result<String, SimpleSqlError> {
        Err(SimpleSqlError::Unimplemented(format!(
            "PostgreSQL has no SQL backup statement for '{database}'; use pg_dump"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_replaces_auto_increment() {
        let d = PostgresDialect;
        assert_eq!(
            d.column(ColumnType::integer(), false, true, false),
            "INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY"
        );
        assert_eq!(
            d.alter_auto_increment("Orders", "id", 1000).as_deref(),
            Some("ALTER TABLE Orders ALTER COLUMN id RESTART WITH 1000;")
        );
    }

    #[test]
    fn text_types_map_to_postgres_names() {
        let d = PostgresDialect;
        assert_eq!(d.type_name(ColumnType::text(20)), "VARCHAR(20)");
        assert_eq!(d.type_name(ColumnType::object()), "TEXT");
        assert_eq!(d.type_name(ColumnType::double(10, 2)), "DOUBLE PRECISION");
        assert_eq!(d.type_name(ColumnType::binary(Some(16))), "BYTEA");
        assert_eq!(d.blob_literal(&[0xde, 0xad]), "'\\xDEAD'");
    }

    #[test]
    fn backup_is_not_expressible() {
        assert!(matches!(
            PostgresDialect.backup_statement("shop", "/tmp/x", false),
            Err(SimpleSqlError::Unimplemented(_))
        ));
    }
}
