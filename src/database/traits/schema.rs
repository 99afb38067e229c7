//! Schema introspection traits.
//!
//! This module defines the `SchemaIntrospection` trait for listing tables
//! and their columns, backed by `INFORMATION_SCHEMA` on server databases
//! and by `sqlite_master` / `pragma_table_info` on SQLite.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::connection::DatabaseConnection;
use super::row::Row;

/// Information about a table, as reported by `INFORMATION_SCHEMA.TABLES`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Catalog (database) the table lives in
    pub table_catalog: String,
    /// Schema/namespace name
    pub table_schema: String,
    pub table_name: String,
    /// Table type (BASE TABLE, VIEW, etc.)
    pub table_type: String,
}

impl TableInfo {
    /// Create a new table info
    pub fn new(
        table_catalog: String,
        table_schema: String,
        table_name: String,
        table_type: String,
    ) -> Self {
        Self {
            table_catalog,
            table_schema,
            table_name,
            table_type,
        }
    }

    /// Get the fully qualified name (schema.table)
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table_schema, self.table_name)
    }

    /// Check if this is a view
    pub fn is_view(&self) -> bool {
        self.table_type.to_uppercase().contains("VIEW")
    }

    /// Read a row with `table_catalog`, `table_schema`, `table_name` and
    /// `table_type` columns.
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self::new(
            text_column(row, "table_catalog")?,
            text_column(row, "table_schema")?,
            text_column(row, "table_name")?,
            text_column(row, "table_type")?,
        ))
    }
}

/// A column of a table, as reported by `INFORMATION_SCHEMA.COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub column_name: String,
    pub data_type: String,
    /// Raw `IS_NULLABLE` flag ("YES" / "NO")
    pub is_nullable: String,
}

impl ColumnDetail {
    pub fn new(column_name: String, data_type: String, is_nullable: String) -> Self {
        Self {
            column_name,
            data_type,
            is_nullable,
        }
    }

    /// Whether NULL values are allowed
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("YES")
    }

    /// Read a row with `column_name`, `data_type` and `is_nullable` columns.
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self::new(
            text_column(row, "column_name")?,
            text_column(row, "data_type")?,
            text_column(row, "is_nullable")?,
        ))
    }
}

fn text_column(row: &Row, name: &str) -> Result<String> {
    row.get_named(name)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("schema query returned no text column {name}"))
}

/// Trait for databases that support schema introspection.
#[async_trait]
pub trait SchemaIntrospection: DatabaseConnection {
    /// Get a list of tables and views visible to the connection.
    async fn get_tables(&self) -> Result<Vec<TableInfo>>;

    /// Get columns for a table, in ordinal order.
    ///
    /// The table name is always bound as a query parameter.
    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDetail>>;
}

/// A boxed schema introspection trait object.
pub type BoxedSchemaIntrospection = Box<dyn SchemaIntrospection>;

/// List every table visible to `conn`.
pub async fn tables(conn: &dyn SchemaIntrospection) -> Result<Vec<TableInfo>> {
    conn.get_tables().await
}

/// List the columns of `table`.
pub async fn columns(conn: &dyn SchemaIntrospection, table: &str) -> Result<Vec<ColumnDetail>> {
    conn.get_columns(table).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::traits::{Cell, Value};

    fn text_row(cells: &[(&str, &str)]) -> Row {
        Row::new(
            cells
                .iter()
                .map(|(name, value)| Cell::new(Value::from(*value), name.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_table_info_full_name() {
        let table = TableInfo::new(
            "erp".to_string(),
            "dbo".to_string(),
            "customers".to_string(),
            "BASE TABLE".to_string(),
        );
        assert_eq!(table.full_name(), "dbo.customers");
        assert!(!table.is_view());
    }

    #[test]
    fn test_table_info_is_view() {
        let view = TableInfo::new(
            "erp".to_string(),
            "dbo".to_string(),
            "active_customers".to_string(),
            "VIEW".to_string(),
        );
        assert!(view.is_view());
    }

    #[test]
    fn test_column_nullable_flag() {
        let col = ColumnDetail::new("email".to_string(), "nvarchar".to_string(), "YES".to_string());
        assert!(col.nullable());

        let col = ColumnDetail::new("id".to_string(), "int".to_string(), "NO".to_string());
        assert!(!col.nullable());
    }

    #[test]
    fn test_table_info_from_row() {
        let row = text_row(&[
            ("TABLE_CATALOG", "erp"),
            ("TABLE_SCHEMA", "dbo"),
            ("TABLE_NAME", "orders"),
            ("TABLE_TYPE", "BASE TABLE"),
        ]);
        let table = TableInfo::from_row(&row).unwrap();
        assert_eq!(table.full_name(), "dbo.orders");
        assert_eq!(table.table_catalog, "erp");
    }

    #[test]
    fn test_column_detail_from_row_missing_column() {
        let row = text_row(&[("column_name", "id"), ("data_type", "int")]);
        assert!(ColumnDetail::from_row(&row).is_err());
    }
}
