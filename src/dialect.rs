//! Backend capability set.
//!
//! Statement building never branches on which backend it talks to; it asks the session's
//! [`Dialect`] for the pieces that differ.

use crate::error::SimpleSqlError;
use crate::schema::ColumnType;
use crate::types::DatabaseType;

pub trait Dialect: Send + Sync + std::fmt::Debug {
    fn database_type(&self) -> DatabaseType;

    /// Spelling of a base column type.
    fn type_name(&self, column_type: ColumnType) -> String;

    /// Keyword appended to auto-increment columns; `None` when the engine assigns keys
    /// implicitly and the keyword must not be emitted.
    fn auto_increment_keyword(&self) -> Option<&'static str>;

    /// Statement that must precede statements relying on foreign-key enforcement.
    fn foreign_key_pragma(&self) -> Option<&'static str>;

    /// Literal for binary data.
    fn blob_literal(&self, bytes: &[u8]) -> String;

    /// Statement listing databases on the server, when databases are server objects.
    fn list_databases_statement(&self) -> Option<String>;

    /// Statement moving the auto-increment counter of `table.column` to `start`.
    fn alter_auto_increment(&self, table: &str, column: &str, start: i64) -> Option<String>;

    /// Column definition fragment: base type plus `NOT NULL`, auto-increment and `UNIQUE`.
    fn column(
        &self,
        column_type: ColumnType,
        nullable: bool,
        auto_increment: bool,
        unique: bool,
    ) -> String {
        let mut def = self.type_name(column_type.storage());
        if !nullable {
            def.push_str(" NOT NULL");
        }
        if auto_increment {
            if let Some(keyword) = self.auto_increment_keyword() {
                def.push(' ');
                def.push_str(keyword);
            }
        }
        if unique {
            def.push_str(" UNIQUE");
        }
        def
    }

    /// Backup statement for `database`.
    ///
    /// The provided form is `BACKUP DATABASE <db> TO DISK = '<path>'[ WITH DIFFERENTIAL];`
    /// for servers that speak it; dialects without it override this.
    ///
    /// # Errors
    /// Overrides return `SimpleSqlError::Unimplemented` when the backend cannot back up
    /// through SQL.
    fn backup_statement(
        &self,
        database: &str,
        filepath: &str,
        differential: bool,
    ) -> Result<String, SimpleSqlError> {
        Ok(crate::query_builder::backup(database, filepath, differential))
    }
}

/// Hex digits for blob literals.
pub(crate) fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02X}");
        acc
    })
}
