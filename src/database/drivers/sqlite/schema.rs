//! SQLite schema introspection implementation.
//!
//! SQLite has no `INFORMATION_SCHEMA`; tables come from `sqlite_master`
//! and columns from the `pragma_table_info` table-valued function, both
//! shaped like their `INFORMATION_SCHEMA` counterparts.

use anyhow::Result;
use async_trait::async_trait;

use super::connection::SqliteConnection;
use crate::database::traits::{
    ColumnDetail, DatabaseConnection, SchemaIntrospection, TableInfo, Value,
};

const TABLES_QUERY: &str = r#"
    SELECT
        'main' AS table_catalog,
        'main' AS table_schema,
        name AS table_name,
        CASE type WHEN 'view' THEN 'VIEW' ELSE 'BASE TABLE' END AS table_type
    FROM sqlite_master
    WHERE type IN ('table', 'view')
        AND name NOT LIKE 'sqlite_%'
    ORDER BY name
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        name AS column_name,
        type AS data_type,
        CASE "notnull" WHEN 0 THEN 'YES' ELSE 'NO' END AS is_nullable
    FROM pragma_table_info(?1)
    ORDER BY cid
"#;

#[async_trait]
impl SchemaIntrospection for SqliteConnection {
    async fn get_tables(&self) -> Result<Vec<TableInfo>> {
        let rows = self.fetch_all(TABLES_QUERY, &[]).await?;
        rows.iter().map(TableInfo::from_row).collect()
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        let rows = self.fetch_all(COLUMNS_QUERY, &[Value::from(table)]).await?;
        rows.iter().map(ColumnDetail::from_row).collect()
    }
}
