// PostgreSQL backend - the client/server session
//
// - config: options and builder
// - dialect: type names and statement capabilities
// - query: result extraction and building
// - session: the `Session` implementation over a tokio-postgres client

pub mod config;
pub mod dialect;
pub mod query;
pub mod session;

pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use dialect::PostgresDialect;
pub use query::build_result_set;
pub use session::PostgresSession;
