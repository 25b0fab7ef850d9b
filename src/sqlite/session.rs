use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::config::SqliteOptions;
use super::dialect::SqliteDialect;
use super::query::build_result_set;
use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::results::ResultSet;
use crate::session::{Session, not_connected};

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// Session over one `SQLite` database file.
pub struct SqliteSession {
    conn: Option<SharedSqliteConnection>,
    options: SqliteOptions,
    dialect: SqliteDialect,
    auto_commit: bool,
}

impl SqliteSession {
    /// Open the database file (created by `SQLite` if missing).
    ///
    /// # Errors
    /// Returns `SimpleSqlError::SqliteError` if the file cannot be opened.
    pub async fn connect(options: SqliteOptions) -> Result<Self, SimpleSqlError> {
        let path = options.db_path.clone();
        let foreign_keys = options.foreign_keys;
        let conn = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(path)?;
            if foreign_keys {
                tracing::debug!(sql = "PRAGMA foreign_keys = ON;", "sqlite execute");
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            }
            Ok::<_, SimpleSqlError>(conn)
        })
        .await
        .map_err(|e| {
            SimpleSqlError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
        })??;
        tracing::info!(path = %options.db_path, "sqlite session opened");
        Ok(Self {
            conn: Some(Arc::new(Mutex::new(conn))),
            options,
            dialect: SqliteDialect,
            auto_commit: true,
        })
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    fn conn_handle(&self) -> Result<SharedSqliteConnection, SimpleSqlError> {
        self.conn.as_ref().map(Arc::clone).ok_or_else(not_connected)
    }

    /// Run work against the raw connection on the blocking pool, opening a transaction
    /// first when auto-commit is off.
    async fn run<F, R>(&self, func: F) -> Result<R, SimpleSqlError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SimpleSqlError> + Send + 'static,
        R: Send + 'static,
    {
        let auto_commit = self.auto_commit;
        run_blocking(self.conn_handle()?, move |conn| {
            if !auto_commit && conn.is_autocommit() {
                tracing::debug!(sql = "BEGIN;", "sqlite execute");
                conn.execute_batch("BEGIN;")?;
            }
            func(conn)
        })
        .await
    }

    fn database_file(&self, name: &str) -> std::path::PathBuf {
        let file = if Path::new(name).extension().is_some_and(|ext| ext == "db") {
            name.to_string()
        } else {
            format!("{name}.db")
        };
        self.options.database_dir().join(file)
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SimpleSqlError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SimpleSqlError> + Send + 'static,
    R: Send + 'static,
{
    // The blocking pool has no subscriber of its own; carry the caller's over.
    let dispatch = tracing::dispatcher::get_default(tracing::Dispatch::clone);
    tokio::task::spawn_blocking(move || {
        tracing::dispatcher::with_default(&dispatch, || {
            let mut guard = conn.blocking_lock();
            func(&mut *guard)
        })
    })
    .await
    .map_err(|e| SimpleSqlError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

#[async_trait]
impl Session for SqliteSession {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn current_database(&self) -> Option<String> {
        self.options.database_name()
    }

    async fn execute(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        tracing::debug!(sql, "sqlite execute");
        let sql_owned = sql.to_owned();
        self.run(move |conn| Ok(conn.execute(&sql_owned, [])?)).await
    }

    async fn execute_standalone(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        self.commit().await?;
        tracing::debug!(sql, "sqlite execute outside transaction");
        let sql_owned = sql.to_owned();
        run_blocking(self.conn_handle()?, move |conn| Ok(conn.execute(&sql_owned, [])?)).await
    }

    async fn select(&mut self, sql: &str) -> Result<ResultSet, SimpleSqlError> {
        tracing::debug!(sql, "sqlite select");
        let sql_owned = sql.to_owned();
        self.run(move |conn| build_result_set(conn, &sql_owned)).await
    }

    async fn commit(&mut self) -> Result<(), SimpleSqlError> {
        run_blocking(self.conn_handle()?, |conn| {
            if !conn.is_autocommit() {
                tracing::debug!(sql = "COMMIT;", "sqlite execute");
                conn.execute_batch("COMMIT;")?;
            }
            Ok(())
        })
        .await
    }

    async fn rollback(&mut self) -> Result<(), SimpleSqlError> {
        run_blocking(self.conn_handle()?, |conn| {
            if !conn.is_autocommit() {
                tracing::debug!(sql = "ROLLBACK;", "sqlite execute");
                conn.execute_batch("ROLLBACK;")?;
            }
            Ok(())
        })
        .await
    }

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), SimpleSqlError> {
        if enabled && !self.auto_commit {
            // Leaving manual mode commits what is pending, as switching autocommit on does.
            self.commit().await?;
        }
        self.auto_commit = enabled;
        Ok(())
    }

    async fn databases(&mut self) -> Result<Vec<String>, SimpleSqlError> {
        let mut entries = tokio::fs::read_dir(self.options.database_dir()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "db") {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn create_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        Err(SimpleSqlError::Unimplemented(format!(
            "SQLite creates database '{name}' by opening its file; connect to it instead"
        )))
    }

    async fn drop_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        let file = self.database_file(name);
        self.close().await?;
        tracing::info!(file = %file.display(), "removing sqlite database file");
        tokio::fs::remove_file(file).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SimpleSqlError> {
        let Some(handle) = self.conn.take() else {
            return Ok(());
        };
        let path = self.options.db_path.clone();
        match Arc::try_unwrap(handle) {
            Ok(mutex) => {
                let conn = mutex.into_inner();
                tokio::task::spawn_blocking(move || conn.close().map_err(|(_, err)| err))
                    .await
                    .map_err(|e| {
                        SimpleSqlError::ConnectionError(format!(
                            "sqlite spawn_blocking join error: {e}"
                        ))
                    })??;
            }
            Err(shared) => {
                tracing::debug!(
                    path = %path,
                    holders = Arc::strong_count(&shared),
                    "sqlite connection still held by a blocking task; close deferred until it finishes"
                );
                return Ok(());
            }
        }
        tracing::info!(path = %path, "sqlite session closed");
        Ok(())
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            tracing::debug!(path = %self.options.db_path, "sqlite session released on drop");
        }
    }
}

impl fmt::Debug for SqliteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSession")
            .field("db_path", &self.options.db_path)
            .field("connected", &self.conn.is_some())
            .field("auto_commit", &self.auto_commit)
            .finish()
    }
}
