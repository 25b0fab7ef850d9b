// SQLite backend - the embedded, file-per-database session
//
// - config: options and builder
// - dialect: type names and statement capabilities
// - query: result extraction and building
// - session: the `Session` implementation on a blocking-pool connection

pub mod config;
pub mod dialect;
pub mod query;
pub mod session;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use dialect::SqliteDialect;
pub use query::build_result_set;
pub use session::SqliteSession;
