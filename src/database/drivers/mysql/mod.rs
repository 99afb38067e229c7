//! MySQL database driver implementation.
//!
//! This module provides a MySQL driver that implements the `DatabaseConnection`
//! and `SchemaIntrospection` traits using SQLx. Also works with MariaDB.
//! Query parameters use `?`.

mod connection;
mod schema;
mod types;

pub use connection::MySqlConnection;
pub use types::MySqlValueConverter;
