//! SQL Server database driver implementation.
//!
//! Implements `DatabaseConnection` and `SchemaIntrospection` on top of
//! tiberius. Query parameters use `@P1`, `@P2`, ...

mod connection;
mod schema;
mod types;

pub use connection::MssqlConnection;
pub use types::MssqlValueConverter;
