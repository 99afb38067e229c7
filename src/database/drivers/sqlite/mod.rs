//! SQLite database driver implementation.
//!
//! This module provides a SQLite driver that implements the `DatabaseConnection`
//! and `SchemaIntrospection` traits using SQLx.
//!
//! SQLite is a file-based embedded database that supports:
//! - File-based databases (`.db`, `.sqlite`, `.sqlite3`)
//! - In-memory databases (`:memory:`)
//! - Read-only mode
//!
//! # Example
//!
//! ```ignore
//! use dbx::database::drivers::sqlite::SqliteConnection;
//! use dbx::database::traits::ConnectionConfig;
//!
//! let config = ConnectionConfig::from_url("sqlite:///var/lib/app/app.db?mode=ro")?;
//! let mut conn = SqliteConnection::new(config);
//! conn.connect().await?;
//! ```

mod connection;
mod schema;
mod types;

pub use connection::SqliteConnection;
pub use types::SqliteValueConverter;
