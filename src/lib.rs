//! A small object-relational layer over `SQLite` (`rusqlite`) and `PostgreSQL`
//! (`tokio-postgres`).
//!
//! Application types implement [`Record`] to describe their table; [`SimpleSql`] turns them
//! into SQL, runs it on a backend [`Session`], and rebuilds records from the rows. List and
//! map fields are stored as tagged JSON text (`{"list": [...]}` / `{"dict": {...}}`) and come
//! back as lists and maps.

pub mod codec;
pub mod dialect;
pub mod diff;
pub mod error;
mod exports;
pub mod facade;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod schema;
pub mod session;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use dialect::Dialect;
pub use error::SimpleSqlError;
pub use facade::{ConnectOptions, SimpleSql, connect};
pub use results::{CustomDbRow, ResultSet};
pub use schema::{ColumnType, FieldDescriptor, ForeignKey, FromRowValue, Record, TableOptions};
pub use session::Session;
pub use types::{DatabaseType, FieldValue, RowValues};

pub use exports::*;
