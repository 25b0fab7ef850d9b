use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SQLITE_MISSING_TABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"no such table:\s*\S+").ok());

#[derive(Debug, Error)]
pub enum SimpleSqlError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error(transparent)]
    CodecError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Database not exists. you cant drop none exists database named \"{0}\"")]
    DatabaseNotExist(String),

    #[error("Cant create database that already exists. database named \"{0}\" is already created.")]
    DatabaseExist(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Record decode error: {0}")]
    DecodeError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl SimpleSqlError {
    /// Whether the backend rejected the statement because the target table does not exist.
    ///
    /// Only this error class is eligible for the create-on-first-insert retry in
    /// [`crate::SimpleSql::add`].
    #[must_use]
    pub fn is_missing_table(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            SimpleSqlError::SqliteError(err) => SQLITE_MISSING_TABLE
                .as_ref()
                .is_some_and(|re| re.is_match(&err.to_string())),
            #[cfg(feature = "postgres")]
            SimpleSqlError::PostgresError(err) => {
                err.code() == Some(&tokio_postgres::error::SqlState::UNDEFINED_TABLE)
            }
            _ => false,
        }
    }
}
