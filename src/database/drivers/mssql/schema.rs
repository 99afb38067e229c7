//! SQL Server schema introspection implementation.

use anyhow::Result;
use async_trait::async_trait;

use super::connection::MssqlConnection;
use crate::database::traits::{
    ColumnDetail, DatabaseConnection, SchemaIntrospection, TableInfo, Value,
};

const TABLES_QUERY: &str = r#"
    SELECT
        TABLE_CATALOG AS table_catalog,
        TABLE_SCHEMA AS table_schema,
        TABLE_NAME AS table_name,
        TABLE_TYPE AS table_type
    FROM INFORMATION_SCHEMA.TABLES
    ORDER BY TABLE_SCHEMA, TABLE_NAME
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        COLUMN_NAME AS column_name,
        DATA_TYPE AS data_type,
        IS_NULLABLE AS is_nullable
    FROM INFORMATION_SCHEMA.COLUMNS
    WHERE TABLE_NAME = @P1
    ORDER BY TABLE_SCHEMA, ORDINAL_POSITION
"#;

#[async_trait]
impl SchemaIntrospection for MssqlConnection {
    async fn get_tables(&self) -> Result<Vec<TableInfo>> {
        let rows = self.fetch_all(TABLES_QUERY, &[]).await?;
        rows.iter().map(TableInfo::from_row).collect()
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        let rows = self.fetch_all(COLUMNS_QUERY, &[Value::from(table)]).await?;
        rows.iter().map(ColumnDetail::from_row).collect()
    }
}
