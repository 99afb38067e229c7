//! MySQL connection implementation.
//!
//! This module implements the `DatabaseConnection` trait for MySQL
//! using SQLx's MySqlPool.

use anyhow::{Result, anyhow};
use async_lock::RwLock;
use async_trait::async_trait;
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::time::Duration;

use super::types::MySqlValueConverter;
use crate::database::error::DbxError;
use crate::database::traits::{
    BoxedConnection, ConnectionConfig, ConnectionParams, DatabaseConnection, DatabaseType, Row,
    ScalarQuery, Value,
};

/// MySQL database connection.
///
/// This struct wraps a SQLx MySqlPool and implements the `DatabaseConnection` trait.
/// Also works with MariaDB.
pub struct MySqlConnection {
    config: ConnectionConfig,
    pool: RwLock<Option<MySqlPool>>,
}

impl std::fmt::Debug for MySqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("config", &self.config)
            .field("pool", &"<MySqlPool>")
            .finish()
    }
}

impl MySqlConnection {
    /// Create a new MySQL connection from configuration.
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

    /// Build MySqlConnectOptions from the configuration.
    fn build_connect_options(&self) -> Result<MySqlConnectOptions> {
        match &self.config.params {
            ConnectionParams::Server {
                hostname,
                port,
                username,
                password,
                database,
                ssl_mode,
                extra_options,
            } => {
                let mut options = MySqlConnectOptions::new()
                    .host(hostname)
                    .port(*port)
                    .username(username)
                    .ssl_mode(MySqlValueConverter::map_ssl_mode(ssl_mode));

                if !password.is_empty() {
                    options = options.password(password);
                }
                if !database.is_empty() {
                    options = options.database(database);
                }
                if let Some(charset) = extra_options.get("charset") {
                    options = options.charset(charset);
                }

                Ok(options)
            }
            ConnectionParams::File { .. } | ConnectionParams::InMemory { .. } => Err(anyhow!(
                "MySQL does not support file-based or in-memory connections"
            )),
        }
    }

    /// Get a reference to the connection pool.
    ///
    /// Returns an error if not connected.
    async fn get_pool(&self) -> Result<MySqlPool> {
        let guard = self.pool.read().await;
        guard
            .as_ref()
            .cloned()
            .ok_or_else(|| DbxError::NotConnected.into())
    }
}

#[async_trait]
impl ScalarQuery for MySqlPool {
    async fn fetch_scalar_string(&self, sql: &str, params: &[Value]) -> Result<String> {
        let row = MySqlValueConverter::bind_all(sqlx::query(sql), params)
            .fetch_optional(self)
            .await?
            .ok_or(DbxError::RowNotFound)?;

        let value: Option<String> = sqlx::Row::try_get(&row, 0)?;
        Ok(value.ok_or(DbxError::UnexpectedNull)?)
    }
}

#[async_trait]
impl ScalarQuery for MySqlConnection {
    async fn fetch_scalar_string(&self, sql: &str, params: &[Value]) -> Result<String> {
        let pool = self.get_pool().await?;
        pool.fetch_scalar_string(sql, params).await
    }
}

#[async_trait]
impl DatabaseConnection for MySqlConnection {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    async fn connect(&mut self) -> Result<()> {
        let options = self.build_connect_options()?;

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::debug!("mysql pool ready for {}", self.config.params.target());

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

        let rows = MySqlValueConverter::bind_all(sqlx::query(sql), params)
            .fetch_all(&pool)
            .await?;

        Ok(rows.iter().map(MySqlValueConverter::convert_row).collect())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let pool = self.get_pool().await?;

        let result = MySqlValueConverter::bind_all(sqlx::query(sql), params)
            .execute(&pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> ConnectionConfig {
        ConnectionConfig::from_url("mysql://root:pw@127.0.0.1/shop?ssl-mode=REQUIRED").unwrap()
    }

    #[test]
    fn test_default_port_and_target() {
        let conn = MySqlConnection::new(create_test_config());
        assert_eq!(conn.database_type(), DatabaseType::MySQL);
        assert_eq!(conn.display_name(), "root@127.0.0.1:3306/shop");
    }

    #[test]
    fn test_build_connect_options() {
        let conn = MySqlConnection::new(create_test_config());
        assert!(conn.build_connect_options().is_ok());

        let file = ConnectionConfig::new(
            "bad".to_string(),
            DatabaseType::MySQL,
            ConnectionParams::file("shop.db".into(), false),
        );
        assert!(MySqlConnection::new(file).build_connect_options().is_err());
    }

    #[test]
    fn test_not_connected() {
        smol::block_on(async {
            let conn = MySqlConnection::new(create_test_config());
            assert!(!conn.is_connected().await);

            let err = conn.execute("DELETE FROM t", &[]).await.unwrap_err();
            assert_eq!(err.downcast_ref::<DbxError>(), Some(&DbxError::NotConnected));
        });
    }
}
