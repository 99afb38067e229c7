//! MySQL schema introspection implementation.
//!
//! Restricted to the schema selected by the connection (`DATABASE()`).

use anyhow::Result;
use async_trait::async_trait;

use super::connection::MySqlConnection;
use crate::database::traits::{
    ColumnDetail, DatabaseConnection, SchemaIntrospection, TableInfo, Value,
};

// MySQL 8 reports some information_schema columns with a binary collation.
const TABLES_QUERY: &str = r#"
    SELECT
        CAST(TABLE_CATALOG AS CHAR) AS table_catalog,
        CAST(TABLE_SCHEMA AS CHAR) AS table_schema,
        CAST(TABLE_NAME AS CHAR) AS table_name,
        CAST(TABLE_TYPE AS CHAR) AS table_type
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = DATABASE()
    ORDER BY TABLE_NAME
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(DATA_TYPE AS CHAR) AS data_type,
        CAST(IS_NULLABLE AS CHAR) AS is_nullable
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE()
        AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

#[async_trait]
impl SchemaIntrospection for MySqlConnection {
    async fn get_tables(&self) -> Result<Vec<TableInfo>> {
        let rows = self.fetch_all(TABLES_QUERY, &[]).await?;
        rows.iter().map(TableInfo::from_row).collect()
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        let rows = self.fetch_all(COLUMNS_QUERY, &[Value::from(table)]).await?;
        rows.iter().map(ColumnDetail::from_row).collect()
    }
}
