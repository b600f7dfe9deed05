//! Database handle ownership.
//!
//! A [`Storage`] is opened once by the entrypoint and handed to every
//! component that needs the database. It wraps a pooled
//! [`DatabaseConnection`]; cloning a `Storage` shares the same pool.
//!
//! ```ignore
//! let storage = Storage::open(&StorageConfig::new("sqlite::memory:")).await?;
//! storage.migrate().await?;
//! let films = FilmRepository::new(storage.clone());
//! // ... serve ...
//! storage.close().await?;
//! ```

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr, Schema,
};
use tracing::{debug, info};

use crate::config::DEFAULT_DB_MAX_CONNECTIONS;
use crate::error::StorageError;
use crate::films::entity::Entity as Film;

/// Connection settings for [`Storage::open`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Database URL (`postgres://...` or `sqlite:...`)
    pub url: String,

    /// Upper bound of the connection pool
    pub max_connections: u32,

    /// Emit every SQL statement through the log
    pub sql_logging: bool,
}

impl StorageConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            sql_logging: false,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_sql_logging(mut self, enabled: bool) -> Self {
        self.sql_logging = enabled;
        self
    }
}

/// The process-wide database handle.
///
/// `Storage::default()` is disconnected: every operation through it fails.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    conn: DatabaseConnection,
}

impl Storage {
    /// Open a pooled connection.
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(config.sql_logging);

        let conn = Database::connect(opt)
            .await
            .map_err(StorageError::Connect)?;

        info!(
            max_connections = config.max_connections,
            "Database connection established"
        );
        Ok(Self { conn })
    }

    /// A handle that is not connected to anything.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Borrow the underlying connection.
    pub fn handle(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self.conn, DatabaseConnection::Disconnected)
    }

    /// Create the film table and its indexes from the entity definition.
    ///
    /// Safe to run on every startup.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        if !self.is_connected() {
            return Err(StorageError::Migrate(disconnected_err()));
        }

        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut table = schema.create_table_from_entity(Film);
        table.if_not_exists();
        self.conn
            .execute(backend.build(&table))
            .await
            .map_err(StorageError::Migrate)?;

        for mut index in schema.create_index_from_entity(Film) {
            index.if_not_exists();
            self.conn
                .execute(backend.build(&index))
                .await
                .map_err(StorageError::Migrate)?;
        }

        debug!("Schema migrated");
        Ok(())
    }

    /// Close the pool. Outstanding clones become unusable.
    pub async fn close(self) -> Result<(), StorageError> {
        if !self.is_connected() {
            return Ok(());
        }
        self.conn.close().await.map_err(StorageError::Close)?;
        info!("Database connection closed");
        Ok(())
    }
}

pub(crate) fn disconnected_err() -> DbErr {
    DbErr::Conn(RuntimeErr::Internal("database is not connected".to_string()))
}
