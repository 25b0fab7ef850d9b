//! Record-level facade over a [`Session`].
//!
//! [`SimpleSql`] turns [`Record`] types into statements, runs them on the session it owns,
//! and rebuilds records from the packed results. Dropping it releases the session.

use crate::dialect::Dialect;
use crate::diff::diff;
use crate::error::SimpleSqlError;
use crate::query_builder::{self, SelectQuery};
use crate::results::ResultSet;
use crate::schema::{ForeignKey, Record, TableOptions};
use crate::session::Session;
use crate::types::{DatabaseType, FieldValue, RowValues};

#[cfg(feature = "postgres")]
use crate::postgres::{PostgresOptions, PostgresSession};
#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteOptions, SqliteSession};

/// Which backend to open, with its settings.
#[derive(Debug, Clone)]
pub enum ConnectOptions {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),
}

impl ConnectOptions {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            ConnectOptions::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            ConnectOptions::Postgres(_) => DatabaseType::Postgres,
        }
    }
}

/// Open a session for `options` and wrap it in the facade.
///
/// # Errors
/// Returns configuration or backend connection errors.
pub async fn connect(options: ConnectOptions) -> Result<SimpleSql, SimpleSqlError> {
    SimpleSql::connect(options).await
}

/// Record-level operations on one session.
#[derive(Debug)]
pub struct SimpleSql {
    session: Box<dyn Session>,
}

impl SimpleSql {
    /// Wrap an already-open session.
    pub fn new(session: impl Session + 'static) -> Self {
        Self {
            session: Box::new(session),
        }
    }

    /// # Errors
    /// Returns configuration or backend connection errors.
    pub async fn connect(options: ConnectOptions) -> Result<Self, SimpleSqlError> {
        let session: Box<dyn Session> = match options {
            #[cfg(feature = "sqlite")]
            ConnectOptions::Sqlite(opts) => Box::new(SqliteSession::connect(opts).await?),
            #[cfg(feature = "postgres")]
            ConnectOptions::Postgres(opts) => Box::new(PostgresSession::connect(opts).await?),
        };
        Ok(Self { session })
    }

    #[must_use]
    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    /// Raw session access for statements the facade does not build.
    pub fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.session.dialect()
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.dialect().database_type()
    }

    async fn enforce_foreign_keys(&mut self) -> Result<(), SimpleSqlError> {
        if let Some(pragma) = self.session.dialect().foreign_key_pragma() {
            self.session.execute(pragma).await?;
        }
        Ok(())
    }

    fn rebuild<R: Record>(rs: &ResultSet) -> Result<Vec<R>, SimpleSqlError> {
        rs.results.iter().map(R::from_row).collect()
    }

    // ---- schema -------------------------------------------------------------

    /// Create the table for `R` if it does not exist.
    ///
    /// Columns and the primary key come from `R::fields()`. When `options` sets an
    /// auto-increment start and the dialect can move the counter, that statement follows.
    ///
    /// # Errors
    /// Returns backend errors from the DDL.
    pub async fn create_table<R: Record>(
        &mut self,
        options: &TableOptions,
    ) -> Result<(), SimpleSqlError> {
        let fields = R::fields();
        let defs = query_builder::column_defs(self.dialect(), &fields);
        let sql = query_builder::create_table(
            R::table_name(),
            &defs,
            R::primary_key(),
            options.foreign_key.as_ref(),
        );
        if options.foreign_key.is_some() {
            self.enforce_foreign_keys().await?;
        }
        self.session.execute(&sql).await?;

        if let Some(start) = options.auto_increment_start {
            let column = fields
                .iter()
                .find(|f| f.auto_increment)
                .map(|f| f.name)
                .or_else(R::primary_key);
            let alter = column.and_then(|c| {
                self.dialect()
                    .alter_auto_increment(R::table_name(), c, start)
            });
            if let Some(alter) = alter {
                self.session.execute(&alter).await?;
            }
        }
        Ok(())
    }

    /// `DROP TABLE IF EXISTS`.
    ///
    /// # Errors
    /// Returns backend errors.
    pub async fn drop_table(&mut self, table: &str) -> Result<(), SimpleSqlError> {
        self.session
            .execute(&query_builder::drop_table(table))
            .await?;
        Ok(())
    }

    /// Add a foreign key to an existing table.
    ///
    /// # Errors
    /// Returns backend errors; `SQLite` cannot add constraints to existing tables.
    pub async fn alter_table_add_foreign_key(
        &mut self,
        table: &str,
        foreign_key: &ForeignKey,
    ) -> Result<(), SimpleSqlError> {
        self.session
            .execute(&query_builder::add_foreign_key(table, foreign_key))
            .await?;
        Ok(())
    }

    // ---- writes -------------------------------------------------------------

    /// Insert `record`; generated fields are left to the backend.
    ///
    /// # Errors
    /// Returns backend errors (including a missing table) and codec errors.
    pub async fn insert<R: Record>(&mut self, record: &R) -> Result<usize, SimpleSqlError> {
        let sql = query_builder::insert(self.dialect(), R::table_name(), &record.values())?;
        self.enforce_foreign_keys().await?;
        self.session.execute(&sql).await
    }

    /// Insert `record`, creating its table and retrying once if the table is missing.
    ///
    /// The first attempt runs guarded, so a failure inside a manual transaction leaves
    /// the earlier work of that transaction intact.
    ///
    /// # Errors
    /// Returns the insert error for anything other than a missing table, or the error of
    /// the create/retry.
    pub async fn add<R: Record>(&mut self, record: &R) -> Result<usize, SimpleSqlError> {
        let sql = query_builder::insert(self.dialect(), R::table_name(), &record.values())?;
        self.enforce_foreign_keys().await?;
        match self.session.execute_guarded(&sql).await {
            Err(err) if err.is_missing_table() => {
                tracing::debug!(table = R::table_name(), "table missing; creating before insert");
                self.create_table::<R>(&TableOptions::default()).await?;
                self.session.execute(&sql).await
            }
            other => other,
        }
    }

    /// Update with the default predicate: the first non-key field becomes the `WHERE`
    /// clause and the remaining non-key fields are assigned.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::ExecutionError` when the record has too few non-key fields,
    /// or backend errors.
    pub async fn update<R: Record>(&mut self, record: &R) -> Result<usize, SimpleSqlError> {
        self.run_update::<R>(&record.values(), None, None).await
    }

    /// Update every non-key field of the rows matching `condition`.
    ///
    /// # Errors
    /// Returns backend errors, or `ExecutionError` when nothing is assignable.
    pub async fn update_where<R: Record>(
        &mut self,
        record: &R,
        condition: &str,
    ) -> Result<usize, SimpleSqlError> {
        self.run_update::<R>(&record.values(), Some(condition), None)
            .await
    }

    /// Assign only the fields of `record` that differ from `previous`.
    ///
    /// # Errors
    /// Returns `ExecutionError` when no field changed (or only one changed and no
    /// condition was given), or backend errors.
    pub async fn update_changed<R: Record>(
        &mut self,
        record: &R,
        previous: &R,
        condition: Option<&str>,
    ) -> Result<usize, SimpleSqlError> {
        let before: Vec<(&str, RowValues)> = previous
            .values()
            .into_iter()
            .filter_map(|(name, value)| match value {
                FieldValue::Value(v) => Some((name, v)),
                FieldValue::Generated => None,
            })
            .collect();
        self.run_update::<R>(&record.values(), condition, Some(before.as_slice()))
            .await
    }

    async fn run_update<R: Record>(
        &mut self,
        values: &[(&'static str, FieldValue)],
        condition: Option<&str>,
        previous: Option<&[(&str, RowValues)]>,
    ) -> Result<usize, SimpleSqlError> {
        let plan = diff(
            self.dialect(),
            values,
            R::primary_key(),
            condition,
            previous,
        )?;
        let sql = query_builder::update(R::table_name(), &plan);
        self.enforce_foreign_keys().await?;
        self.session.execute(&sql).await
    }

    /// `DELETE FROM R WHERE column = value`.
    ///
    /// # Errors
    /// Returns backend or codec errors.
    pub async fn query_delete_by<R: Record>(
        &mut self,
        column: &str,
        value: impl Into<RowValues>,
    ) -> Result<usize, SimpleSqlError> {
        let sql = query_builder::delete_by(self.dialect(), R::table_name(), column, &value.into())?;
        self.enforce_foreign_keys().await?;
        self.session.execute(&sql).await
    }

    /// `DELETE FROM R WHERE predicate`.
    ///
    /// # Errors
    /// Returns backend errors.
    pub async fn delete_where<R: Record>(&mut self, predicate: &str) -> Result<usize, SimpleSqlError> {
        let sql = query_builder::delete_where(R::table_name(), predicate);
        self.enforce_foreign_keys().await?;
        self.session.execute(&sql).await
    }

    /// Delete the rows equal to `record` on every non-generated field.
    ///
    /// # Errors
    /// Returns backend or codec errors.
    pub async fn delete<R: Record>(&mut self, record: &R) -> Result<usize, SimpleSqlError> {
        let sql =
            query_builder::delete_matching(self.dialect(), R::table_name(), &record.values())?;
        self.enforce_foreign_keys().await?;
        self.session.execute(&sql).await
    }

    // ---- reads --------------------------------------------------------------

    /// Every row of `R`'s table, in backend order.
    ///
    /// # Errors
    /// Returns backend errors, or `DecodeError` if a row does not fit `R`.
    pub async fn query_all<R: Record>(&mut self) -> Result<Vec<R>, SimpleSqlError> {
        self.select(&SelectQuery::new(R::table_name())).await
    }

    /// Every row ordered by `column`, descending when `reverse`.
    ///
    /// # Errors
    /// Returns backend or decode errors.
    pub async fn query_ordered<R: Record>(
        &mut self,
        column: &str,
        reverse: bool,
    ) -> Result<Vec<R>, SimpleSqlError> {
        self.select(&SelectQuery::new(R::table_name()).order_by(column, reverse))
            .await
    }

    /// Rows matching a raw boolean expression; `None` when nothing matches.
    ///
    /// # Errors
    /// Returns backend or decode errors.
    pub async fn query_filters<R: Record>(
        &mut self,
        condition: &str,
    ) -> Result<Option<Vec<R>>, SimpleSqlError> {
        let rows: Vec<R> = self
            .select(&SelectQuery::new(R::table_name()).condition(condition))
            .await?;
        Ok((!rows.is_empty()).then_some(rows))
    }

    /// First row matching a raw boolean expression.
    ///
    /// # Errors
    /// Returns backend or decode errors.
    pub async fn query_filters_first<R: Record>(
        &mut self,
        condition: &str,
    ) -> Result<Option<R>, SimpleSqlError> {
        self.select_first(
            &SelectQuery::new(R::table_name())
                .condition(condition)
                .first(true),
        )
        .await
    }

    /// Rows where `column` equals `value`; lists and maps compare by their envelope.
    /// `None` when nothing matches.
    ///
    /// # Errors
    /// Returns backend, codec, or decode errors.
    pub async fn query_filter_by<R: Record>(
        &mut self,
        column: &str,
        value: impl Into<RowValues>,
    ) -> Result<Option<Vec<R>>, SimpleSqlError> {
        let condition = query_builder::assignment(column, &value.into(), self.dialect())?;
        self.query_filters(&condition).await
    }

    /// First row where `column` equals `value`.
    ///
    /// # Errors
    /// Returns backend, codec, or decode errors.
    pub async fn query_filter_by_first<R: Record>(
        &mut self,
        column: &str,
        value: impl Into<RowValues>,
    ) -> Result<Option<R>, SimpleSqlError> {
        let condition = query_builder::assignment(column, &value.into(), self.dialect())?;
        self.query_filters_first(&condition).await
    }

    /// Run a built `SELECT` and rebuild records from it.
    ///
    /// # Errors
    /// Returns backend or decode errors.
    pub async fn select<R: Record>(&mut self, query: &SelectQuery) -> Result<Vec<R>, SimpleSqlError> {
        let rs = self.query_rows(query).await?;
        Self::rebuild(&rs)
    }

    /// Run a built `SELECT` and return at most one record.
    ///
    /// # Errors
    /// Returns backend or decode errors.
    pub async fn select_first<R: Record>(
        &mut self,
        query: &SelectQuery,
    ) -> Result<Option<R>, SimpleSqlError> {
        let rs = self.query_rows(&query.clone().first(true)).await?;
        rs.into_first().map(|row| R::from_row(&row)).transpose()
    }

    /// Run a built `SELECT` and return the packed rows, for column subsets and `DISTINCT`.
    ///
    /// # Errors
    /// Returns backend errors.
    pub async fn query_rows(&mut self, query: &SelectQuery) -> Result<ResultSet, SimpleSqlError> {
        self.session.select(&query.build()).await
    }

    // ---- databases ----------------------------------------------------------

    /// Databases visible to the session.
    ///
    /// # Errors
    /// Returns backend or filesystem errors.
    pub async fn local_databases(&mut self) -> Result<Vec<String>, SimpleSqlError> {
        self.session.databases().await
    }

    fn listed(databases: &[String], name: &str) -> bool {
        let file = format!("{name}.db");
        databases.iter().any(|db| db == name || *db == file)
    }

    /// Create a database after checking it is not already there.
    ///
    /// # Errors
    /// Returns `DatabaseExist` if it is listed, `Unimplemented` on `SQLite`, or backend errors.
    pub async fn create_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        let databases = self.local_databases().await?;
        if Self::listed(&databases, name) {
            return Err(SimpleSqlError::DatabaseExist(name.to_string()));
        }
        self.session.create_database(name).await
    }

    /// Drop a database after checking it exists.
    ///
    /// # Errors
    /// Returns `DatabaseNotExist` if it is not listed, or backend/filesystem errors.
    pub async fn drop_database(&mut self, name: &str) -> Result<(), SimpleSqlError> {
        let databases = self.local_databases().await?;
        if !Self::listed(&databases, name) {
            return Err(SimpleSqlError::DatabaseNotExist(name.to_string()));
        }
        self.session.drop_database(name).await
    }

    /// Back up the current database to `filepath`.
    ///
    /// Backup statements cannot run inside a transaction block, so pending work of a
    /// manual transaction is committed first.
    ///
    /// # Errors
    /// Returns `ConnectionError` when the session is not bound to a database,
    /// `Unimplemented` when the dialect cannot back up through SQL, or backend errors.
    pub async fn backup(&mut self, filepath: &str, differential: bool) -> Result<(), SimpleSqlError> {
        let database = self.session.current_database().ok_or_else(|| {
            SimpleSqlError::ConnectionError(
                "session is not bound to a database; nothing to back up".to_string(),
            )
        })?;
        let sql = self
            .dialect()
            .backup_statement(&database, filepath, differential)?;
        self.session.execute_standalone(&sql).await?;
        Ok(())
    }

    // ---- transactions & lifecycle --------------------------------------------

    /// # Errors
    /// Returns backend errors.
    pub async fn commit(&mut self) -> Result<(), SimpleSqlError> {
        self.session.commit().await
    }

    /// # Errors
    /// Returns backend errors.
    pub async fn rollback(&mut self) -> Result<(), SimpleSqlError> {
        self.session.rollback().await
    }

    /// # Errors
    /// Returns backend errors from committing pending work when switching auto-commit on.
    pub async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), SimpleSqlError> {
        self.session.set_auto_commit(enabled).await
    }

    /// Close the session; later calls fail with `ConnectionError`, a second close is a no-op.
    ///
    /// # Errors
    /// Returns errors from releasing the connection.
    pub async fn close(&mut self) -> Result<(), SimpleSqlError> {
        self.session.close().await
    }
}
