use super::PostgresSession;
use crate::error::SimpleSqlError;

/// Connection settings for a `PostgreSQL` session.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    /// Database the session binds to.
    pub database: String,
    /// Create `database` first if it does not exist yet.
    pub create_and_ignore: bool,
    /// Database used to list, create, and drop other databases.
    pub maintenance_db: String,
}

impl PostgresOptions {
    /// Start from host, user, and the target database; port defaults to 5432.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 5432,
            user: user.into(),
            password: None,
            database: database.into(),
            create_and_ignore: false,
            maintenance_db: "postgres".to_string(),
        }
    }

    /// Check the fields a connection cannot do without.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), SimpleSqlError> {
        if self.host.is_empty() {
            return Err(SimpleSqlError::ConfigError("host is required".to_string()));
        }
        if self.user.is_empty() {
            return Err(SimpleSqlError::ConfigError("user is required".to_string()));
        }
        if self.database.is_empty() {
            return Err(SimpleSqlError::ConfigError(
                "database is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Driver configuration pointed at `dbname`.
    #[must_use]
    pub fn config_for(&self, dbname: &str) -> tokio_postgres::Config {
        let mut cfg = tokio_postgres::Config::new();
        cfg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(dbname);
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        cfg
    }
}

/// Fluent builder for `PostgreSQL` options.
#[derive(Debug, Clone)]
pub struct PostgresOptionsBuilder {
    opts: PostgresOptions,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            opts: PostgresOptions::new(host, user, database),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn create_and_ignore(mut self, create: bool) -> Self {
        self.opts.create_and_ignore = create;
        self
    }

    #[must_use]
    pub fn maintenance_db(mut self, name: impl Into<String>) -> Self {
        self.opts.maintenance_db = name.into();
        self
    }

    /// # Errors
    /// Returns `SimpleSqlError::ConfigError` if a required field is empty.
    pub fn finish(self) -> Result<PostgresOptions, SimpleSqlError> {
        self.opts.validate()?;
        Ok(self.opts)
    }

    /// Validate and connect.
    ///
    /// # Errors
    /// Returns `SimpleSqlError::ConfigError` for incomplete options, or the driver error when
    /// the server refuses the connection.
    pub async fn connect(self) -> Result<PostgresSession, SimpleSqlError> {
        PostgresSession::connect(self.finish()?).await
    }
}
