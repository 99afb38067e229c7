//! Database driver implementations.
//!
//! - **PostgreSQL**: via SQLx
//! - **MySQL**: MySQL/MariaDB via SQLx
//! - **SQLite**: embedded SQLite via SQLx
//! - **SQL Server**: via tiberius
//!
//! Each driver implements the `DatabaseConnection` and `SchemaIntrospection` traits.

mod factory;

pub mod mssql;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use factory::{ConnectionFactory, open, open_with_schema};
