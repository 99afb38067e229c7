//! SQLite connection implementation.
//!
//! This module implements the `DatabaseConnection` trait for SQLite
//! using SQLx's SqlitePool.

use anyhow::{Result, anyhow};
use async_lock::RwLock;
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::types::SqliteValueConverter;
use crate::database::error::DbxError;
use crate::database::traits::{
    BoxedConnection, ConnectionConfig, ConnectionParams, DatabaseConnection, DatabaseType, Row,
    ScalarQuery, Value,
};

/// SQLite database connection.
///
/// This struct wraps a SQLx SqlitePool and implements the `DatabaseConnection` trait.
/// SQLite supports both file-based and in-memory databases.
pub struct SqliteConnection {
    config: ConnectionConfig,
    pool: RwLock<Option<SqlitePool>>,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("config", &self.config)
            .field("pool", &"<SqlitePool>")
            .finish()
    }
}

impl SqliteConnection {
    /// Create a new SQLite connection from configuration.
    ///
    /// This does not connect immediately - call `connect()` to establish the connection.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    /// Create a boxed connection (for factory use).
    pub fn boxed(config: ConnectionConfig) -> BoxedConnection {
        Box::new(Self::new(config))
    }

    /// Build SqliteConnectOptions from the configuration.
    fn build_connect_options(&self) -> Result<SqliteConnectOptions> {
        match &self.config.params {
            ConnectionParams::File {
                path, read_only, ..
            } => {
                let mut options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(!read_only)
                    .foreign_keys(true);

                if *read_only {
                    options = options.read_only(true);
                } else {
                    options = options.journal_mode(SqliteJournalMode::Wal);
                }

                Ok(options)
            }
            // sqlx gives every `:memory:` options value its own named
            // shared-cache database.
            ConnectionParams::InMemory { .. } => {
                Ok(SqliteConnectOptions::from_str(":memory:")?.foreign_keys(true))
            }
            ConnectionParams::Server { .. } => Err(anyhow!(
                "SQLite does not support server-based connections. Use File or InMemory params."
            )),
        }
    }

    /// Get a reference to the connection pool.
    ///
    /// Returns an error if not connected.
    async fn get_pool(&self) -> Result<SqlitePool> {
        let guard = self.pool.read().await;
        guard
            .as_ref()
            .cloned()
            .ok_or_else(|| DbxError::NotConnected.into())
    }
}

#[async_trait]
impl ScalarQuery for SqlitePool {
    async fn fetch_scalar_string(&self, sql: &str, params: &[Value]) -> Result<String> {
        let row = SqliteValueConverter::bind_all(sqlx::query(sql), params)
            .fetch_optional(self)
            .await?
            .ok_or(DbxError::RowNotFound)?;

        let value: Option<String> = sqlx::Row::try_get(&row, 0)?;
        Ok(value.ok_or(DbxError::UnexpectedNull)?)
    }
}

#[async_trait]
impl ScalarQuery for SqliteConnection {
    async fn fetch_scalar_string(&self, sql: &str, params: &[Value]) -> Result<String> {
        let pool = self.get_pool().await?;
        pool.fetch_scalar_string(sql, params).await
    }
}

#[async_trait]
impl DatabaseConnection for SqliteConnection {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    async fn connect(&mut self) -> Result<()> {
        let options = self.build_connect_options()?;

        // An in-memory database lives only as long as a connection to it,
        // so keep exactly one and never let it idle out.
        let pool_options = match self.config.params {
            ConnectionParams::InMemory { .. } => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            _ => SqlitePoolOptions::new().max_connections(3),
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::debug!("sqlite pool ready for {}", self.config.params.target());

        let mut guard = self.pool.write().await;
        *guard = Some(pool);

        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut guard = self.pool.write().await;
        if let Some(pool) = guard.take() {
            pool.close().await;
            Ok(())
        } else {
            Err(anyhow!("No active database connection to disconnect"))
        }
    }

    async fn is_connected(&self) -> bool {
        let guard = self.pool.read().await;
        if let Some(pool) = guard.as_ref() {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }

    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let pool = self.get_pool().await?;

        let rows = SqliteValueConverter::bind_all(sqlx::query(sql), params)
            .fetch_all(&pool)
            .await?;

        Ok(rows.iter().map(SqliteValueConverter::convert_row).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let pool = self.get_pool().await?;

        let result = SqliteValueConverter::bind_all(sqlx::query(sql), params)
            .execute(&pool)
            .await?;

        Ok(result.rows_affected())
    }
}
