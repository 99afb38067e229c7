//! Small database helpers over sqlx and tiberius.
//!
//! Open a connection from a URL, read nullable timestamps with [`NullTime`],
//! memoize single-row text lookups with [`StringMapper`], and list tables
//! and columns through `INFORMATION_SCHEMA`.
//!
//! ```ignore
//! use std::sync::Arc;
//! use dbx::{StringMapper, open};
//!
//! let conn = Arc::from(open("postgres://app@localhost/erp").await?);
//! let status = StringMapper::new(conn, "SELECT label FROM status WHERE code = $1");
//! println!("{}", status.map(3_i32).await?);
//! ```

pub mod database;

pub use database::{ConnectionFactory, DbxError, NullTime, StringMapper, open, open_with_schema};
