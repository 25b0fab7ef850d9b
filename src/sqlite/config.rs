use std::path::{Path, PathBuf};

use super::SqliteSession;
use crate::error::SimpleSqlError;

/// Options for opening a `SQLite` session.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Turn on foreign-key enforcement for the whole connection at open time.
    pub foreign_keys: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            foreign_keys: false,
        }
    }

    #[must_use]
    pub fn with_foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path.is_empty() || self.db_path == ":memory:" || self.db_path.contains("mode=memory")
    }

    /// Directory whose `.db` files are reported as databases.
    #[must_use]
    pub fn database_dir(&self) -> PathBuf {
        match Path::new(&self.db_path).parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.is_in_memory() => {
                parent.to_path_buf()
            }
            _ => PathBuf::from("."),
        }
    }

    /// Database name: the file stem of `db_path`; `None` for in-memory databases.
    #[must_use]
    pub fn database_name(&self) -> Option<String> {
        if self.is_in_memory() {
            return None;
        }
        Path::new(&self.db_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a session with these options.
    ///
    /// # Errors
    /// Returns `SimpleSqlError` if the database file cannot be opened.
    pub async fn connect(self) -> Result<SqliteSession, SimpleSqlError> {
        SqliteSession::connect(self.finish()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_directories() {
        let opts = SqliteOptions::new("data/orders.db");
        assert_eq!(opts.database_name().as_deref(), Some("orders"));
        assert_eq!(opts.database_dir(), PathBuf::from("data"));

        let bare = SqliteOptions::new("orders.db");
        assert_eq!(bare.database_dir(), PathBuf::from("."));

        let mem = SqliteOptions::new(":memory:");
        assert!(mem.is_in_memory());
        assert_eq!(mem.database_name(), None);
    }
}
