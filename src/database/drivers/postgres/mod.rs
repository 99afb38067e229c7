//! PostgreSQL database driver implementation.
//!
//! This module provides a PostgreSQL driver that implements the `DatabaseConnection`
//! and `SchemaIntrospection` traits using SQLx. Query parameters use `$1`, `$2`, ...
//!
//! # Example
//!
//! ```ignore
//! use dbx::database::drivers::postgres::PostgresConnection;
//! use dbx::database::traits::ConnectionConfig;
//!
//! let config = ConnectionConfig::from_url("postgres://app@localhost/erp")?;
//! let mut conn = PostgresConnection::new(config);
//! conn.connect().await?;
//! ```

mod connection;
mod schema;
mod types;

pub use connection::PostgresConnection;
pub use types::PgValueConverter;
