//! Core database connection traits.
//!
//! `DatabaseConnection` is the trait every driver implements. `ScalarQuery`
//! is the narrow slice of it that lookup helpers such as `StringMapper`
//! depend on, so they can run against a bare sqlx pool or a test double
//! as easily as against a full driver connection.

use anyhow::Result;
use async_trait::async_trait;

use super::row::{Row, Value};
use super::types::{ConnectionConfig, DatabaseType};

/// A connection that can run a single-row, single-column text query.
///
/// Implementations bind `params` positionally to the placeholders of `sql`
/// (in the driver's own placeholder syntax), fetch exactly one row, and
/// decode its first column as non-null text. Zero rows, a NULL value, and
/// any driver failure are all errors.
#[async_trait]
pub trait ScalarQuery: Send + Sync {
    async fn fetch_scalar_string(&self, sql: &str, params: &[Value]) -> Result<String>;
}

/// Core trait for all database connections.
///
/// # Example
///
/// ```ignore
/// use dbx::database::traits::DatabaseConnection;
///
/// async fn example(conn: &dyn DatabaseConnection) -> anyhow::Result<()> {
///     if conn.is_connected().await {
///         let rows = conn.fetch_all("SELECT 1", &[]).await?;
///         // Process rows...
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DatabaseConnection: ScalarQuery {
    /// Get the database type for this connection
    fn database_type(&self) -> DatabaseType;

    /// Get the connection configuration
    fn connection_config(&self) -> &ConnectionConfig;

    /// Establish a connection to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established, such as:
    /// - Invalid credentials
    /// - Network errors
    /// - Server not available
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from the database.
    ///
    /// This should gracefully close the connection and release any resources.
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if the connection is currently active.
    ///
    /// This performs a lightweight ping to verify the connection is alive.
    async fn is_connected(&self) -> bool;

    /// Run a query with positional parameters and decode every row.
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Run a statement with positional parameters and return the number of
    /// rows it affected.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Get a display name for the current connection.
    ///
    /// Returns "user@host:port/database" for server connections or the file
    /// path for file-based connections. Never includes the password.
    fn display_name(&self) -> String {
        self.connection_config().params.target()
    }
}

/// A boxed database connection trait object.
pub type BoxedConnection = Box<dyn DatabaseConnection>;
