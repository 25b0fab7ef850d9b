//! Backend session contract.
//!
//! A session owns exactly one connection. It is connected when constructed, accepts
//! statements one at a time (every method takes `&mut self`), and is closed exactly once:
//! either by [`Session::close`] or when it is dropped. Sharing a session between tasks
//! requires the caller to serialize access.

use async_trait::async_trait;

use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::results::ResultSet;

#[async_trait]
pub trait Session: Send + std::fmt::Debug {
    fn dialect(&self) -> &dyn Dialect;

    fn is_connected(&self) -> bool;

    /// Name of the database this session is bound to, if any.
    fn current_database(&self) -> Option<String>;

    /// Run a statement that returns no rows; yields the affected row count.
    async fn execute(&mut self, sql: &str) -> Result<usize, SimpleSqlError>;

    /// Run a statement whose failure must leave an open manual transaction usable.
    ///
    /// Backends where a failed statement does not poison the transaction can rely on the
    /// provided default.
    async fn execute_guarded(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        self.execute(sql).await
    }

    /// Commit pending work, then run a statement that cannot run inside a transaction
    /// block (`VACUUM INTO`, `CREATE DATABASE`).
    async fn execute_standalone(&mut self, sql: &str) -> Result<usize, SimpleSqlError>;

    /// Run a query and pack its rows.
    async fn select(&mut self, sql: &str) -> Result<ResultSet, SimpleSqlError>;

    async fn commit(&mut self) -> Result<(), SimpleSqlError>;

    async fn rollback(&mut self) -> Result<(), SimpleSqlError>;

    /// With auto-commit off, a transaction is opened before the next statement and kept
    /// open until `commit`/`rollback`.
    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), SimpleSqlError>;

    /// Names of the databases visible to this session.
    async fn databases(&mut self) -> Result<Vec<String>, SimpleSqlError>;

    async fn create_database(&mut self, name: &str) -> Result<(), SimpleSqlError>;

    async fn drop_database(&mut self, name: &str) -> Result<(), SimpleSqlError>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), SimpleSqlError>;
}

pub(crate) fn not_connected() -> SimpleSqlError {
    SimpleSqlError::ConnectionError("session is closed".into())
}
