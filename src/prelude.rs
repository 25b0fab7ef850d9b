//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::facade::{ConnectOptions, SimpleSql, connect};
pub use crate::query_builder::SelectQuery;
pub use crate::{
    ColumnType, CustomDbRow, DatabaseType, Dialect, FieldDescriptor, FieldValue, ForeignKey,
    FromRowValue, Record, ResultSet, RowValues, Session, SimpleSqlError, TableOptions,
};

#[cfg(feature = "postgres")]
pub use crate::exports::{PostgresOptions, PostgresOptionsBuilder, PostgresSession};

#[cfg(feature = "sqlite")]
pub use crate::exports::{SqliteOptions, SqliteOptionsBuilder, SqliteSession};
