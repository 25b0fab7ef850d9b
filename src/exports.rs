//! Backend-specific type exports.
//!
//! This module contains all the conditional feature exports for the backends, keeping them
//! organized in one place.

// PostgreSQL exports
#[cfg(feature = "postgres")]
pub use crate::postgres::build_result_set as postgres_build_result_set;
#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresDialect, PostgresOptions, PostgresOptionsBuilder, PostgresSession};

// SQLite exports
#[cfg(feature = "sqlite")]
pub use crate::sqlite::build_result_set as sqlite_build_result_set;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDialect, SqliteOptions, SqliteOptionsBuilder, SqliteSession};
