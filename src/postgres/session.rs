use std::fmt;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use super::config::PostgresOptions;
use super::dialect::PostgresDialect;
use super::query::build_result_set;
use crate::dialect::Dialect;
use crate::error::SimpleSqlError;
use crate::query_builder;
use crate::results::ResultSet;
use crate::session::{Session, not_connected};
use crate::types::RowValues;

const GUARD_SAVEPOINT: &str = "SAVEPOINT simplesql_guard";
const GUARD_RELEASE: &str = "RELEASE SAVEPOINT simplesql_guard";
const GUARD_ROLLBACK: &str = "ROLLBACK TO SAVEPOINT simplesql_guard";

/// Session over one `PostgreSQL` database.
///
/// The driver's connection future runs on its own task; the session owns the client half.
/// `close` lets that task finish, dropping the session aborts it.
pub struct PostgresSession {
    client: Option<Client>,
    connection_task: Option<JoinHandle<()>>,
    options: PostgresOptions,
    database: String,
    dialect: PostgresDialect,
    auto_commit: bool,
    in_transaction: bool,
}

async fn open(
    options: &PostgresOptions,
    dbname: &str,
) -> Result<(Client, JoinHandle<()>), SimpleSqlError> {
    let (client, connection) = options.config_for(dbname).connect(NoTls).await?;
    let db = dbname.to_string();
    let task = tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(database = %db, error = %e, "postgres connection error");
        }
    });
    Ok((client, task))
}

async fn list_databases(
    client: &Client,
    dialect: &PostgresDialect,
) -> Result<Vec<String>, SimpleSqlError> {
    let sql = dialect
        .list_databases_statement()
        .ok_or_else(|| SimpleSqlError::Unimplemented("listing databases".to_string()))?;
    let rs = build_result_set(client, &sql).await?;
    Ok(rs
        .results
        .iter()
        .filter_map(|row| {
            row.get_by_index(0)
                .and_then(RowValues::as_text)
                .map(str::to_string)
        })
        .collect())
}

/// The connection future resolves once its client is gone.
async fn finish(task: JoinHandle<()>) {
    if let Err(e) = task.await {
        tracing::debug!(error = %e, "postgres connection task did not finish cleanly");
    }
}

impl PostgresSession {
    /// Connect to `options.database`, creating it first when `create_and_ignore` is set.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::ConfigError` for incomplete options, or driver errors from
    /// connecting and creating.
    pub async fn connect(options: PostgresOptions) -> Result<Self, SimpleSqlError> {
        options.validate()?;
        if options.create_and_ignore {
            let (client, task) = open(&options, &options.maintenance_db).await?;
            let existing = list_databases(&client, &PostgresDialect).await?;
            if existing.iter().any(|name| name == &options.database) {
                tracing::debug!(database = %options.database, "database already exists");
            } else {
                tracing::info!(database = %options.database, "creating database");
                let sql = query_builder::create_database(&options.database);
                tracing::debug!(sql = %sql, "postgres batch");
                client.batch_execute(&sql).await?;
            }
            drop(client);
            finish(task).await;
        }

        let database = options.database.clone();
        let (client, task) = open(&options, &database).await?;
        tracing::info!(host = %options.host, database = %database, "postgres session opened");
        Ok(Self {
            client: Some(client),
            connection_task: Some(task),
            options,
            database,
            dialect: PostgresDialect,
            auto_commit: true,
            in_transaction: false,
        })
    }

    #[must_use]
    pub fn options(&self) -> &PostgresOptions {
        &self.options
    }

    fn client(&self) -> Result<&Client, SimpleSqlError> {
        self.client.as_ref().ok_or_else(not_connected)
    }

    /// Close the current connection and bind the session to `dbname`.
    async fn reconnect(&mut self, dbname: &str) -> Result<(), SimpleSqlError> {
        self.shutdown().await;
        let (client, task) = open(&self.options, dbname).await?;
        self.client = Some(client);
        self.connection_task = Some(task);
        self.database = dbname.to_string();
        self.in_transaction = false;
        tracing::debug!(database = %dbname, "postgres session rebound");
        Ok(())
    }

    /// Send a statement without parameters or a row count.
    async fn batch(&self, sql: &str) -> Result<(), SimpleSqlError> {
        tracing::debug!(sql, "postgres batch");
        self.client()?.batch_execute(sql).await?;
        Ok(())
    }

    async fn run_statement(&self, sql: &str) -> Result<usize, SimpleSqlError> {
        let rows = self.client()?.execute(sql, &[]).await?;
        usize::try_from(rows).map_err(|e| {
            SimpleSqlError::ExecutionError(format!(
                "postgres affected rows conversion error: {e}"
            ))
        })
    }

    async fn begin_if_needed(&mut self) -> Result<(), SimpleSqlError> {
        if !self.auto_commit && !self.in_transaction {
            self.batch("BEGIN").await?;
            self.in_transaction = true;
        }
        Ok(())
    }

    /// Drop the client and wait for the connection task to say goodbye to the server, so
    /// the backend process is gone before the caller acts on the database.
    async fn shutdown(&mut self) -> bool {
        let had_client = self.client.take().is_some();
        if let Some(task) = self.connection_task.take() {
            finish(task).await;
        }
        self.in_transaction = false;
        had_client
    }

    fn release(&mut self) -> bool {
        let had_client = self.client.take().is_some();
        if let Some(task) = self.connection_task.take() {
            task.abort();
        }
        self.in_transaction = false;
        had_client
    }
}

#[async_trait]
impl Session for PostgresSession {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn is_connected(&self) -> bool {
        self.client.as_ref().is_some_and(|c| !c.is_closed())
    }

    fn current_database(&self) -> Option<String> {
        self.client.as_ref().map(|_| self.database.clone())
    }

    async fn execute(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        tracing::debug!(sql, "postgres execute");
        self.begin_if_needed().await?;
        self.run_statement(sql).await
    }

    async fn execute_guarded(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        self.begin_if_needed().await?;
        if !self.in_transaction {
            return self.execute(sql).await;
        }
        // A failed statement aborts the whole transaction unless it ran under a savepoint.
        self.batch(GUARD_SAVEPOINT).await?;
        tracing::debug!(sql, "postgres execute");
        match self.run_statement(sql).await {
            Ok(rows) => {
                self.batch(GUARD_RELEASE).await?;
                Ok(rows)
            }
            Err(err) => {
                self.batch(GUARD_ROLLBACK).await?;
                Err(err)
            }
        }
    }

    async fn execute_standalone(&mut self, sql: &str) -> Result<usize, SimpleSqlError> {
        self.commit().await?;
        tracing::debug!(sql, "postgres execute outside transaction");
        self.run_statement(sql).await
    }

    async fn select(&mut self, sql: &str) -> Result<ResultSet, SimpleSqlError> {
        tracing::debug!(sql, "postgres select");
        self.begin_if_needed().await?;
        build_result_set(self.client()?, sql).await
    }

    async fn commit(&mut self) -> Result<(), SimpleSqlError> {
        if self.in_transaction {
            self.batch("COMMIT").await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SimpleSqlError> {
        if self.in_transaction {
            self.batch("ROLLBACK").await?;
            self.in_transaction = false;
        }
        Ok(())
    }

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), SimpleSqlError> {
        if enabled {
            self.commit().await?;
        }
        self.auto_commit = enabled;
        Ok(())
    }

    async fn databases(&mut self) -> Result<Vec<String>, SimpleSqlError> {
        list_databases(self.client()?, &self.dialect).await
    }

    async fn create_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        // CREATE DATABASE cannot run inside a transaction block.
        self.commit().await?;
        self.batch(&query_builder::create_database(name)).await?;
        tracing::info!(database = %name, "database created");
        self.reconnect(name).await
    }

    async fn drop_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        self.commit().await?;
        if self.database == name {
            let maintenance = self.options.maintenance_db.clone();
            self.reconnect(&maintenance).await?;
        }
        self.batch(&query_builder::drop_database(name)).await?;
        tracing::info!(database = %name, "database dropped");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SimpleSqlError> {
        if self.shutdown().await {
            tracing::info!(database = %self.database, "postgres session closed");
        }
        Ok(())
    }
}

impl Drop for PostgresSession {
    fn drop(&mut self) {
        if self.release() {
            tracing::debug!(database = %self.database, "postgres session released on drop");
        }
    }
}

impl fmt::Debug for PostgresSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSession")
            .field("host", &self.options.host)
            .field("database", &self.database)
            .field("connected", &self.client.is_some())
            .field("auto_commit", &self.auto_commit)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
