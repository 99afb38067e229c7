//! Database access layer.
//!
//! - [`traits`]: driver-independent connection, row and schema types
//! - [`drivers`]: PostgreSQL, MySQL, SQLite and SQL Server implementations
//! - [`nullable`]: the [`NullTime`] nullable timestamp adapter
//! - [`mapper`]: the memoizing [`StringMapper`]

pub mod drivers;
pub mod error;
pub mod mapper;
pub mod nullable;
pub mod traits;

pub use drivers::{ConnectionFactory, open, open_with_schema};
pub use error::DbxError;
pub use mapper::StringMapper;
pub use nullable::NullTime;
