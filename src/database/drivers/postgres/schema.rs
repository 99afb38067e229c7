//! PostgreSQL schema introspection implementation.

use anyhow::Result;
use async_trait::async_trait;

use super::connection::PostgresConnection;
use crate::database::traits::{
    ColumnDetail, DatabaseConnection, SchemaIntrospection, TableInfo, Value,
};

// information_schema columns are domain types that sqlx does not decode as
// text, hence the casts.
const TABLES_QUERY: &str = r#"
    SELECT
        table_catalog::text AS table_catalog,
        table_schema::text AS table_schema,
        table_name::text AS table_name,
        table_type::text AS table_type
    FROM information_schema.tables
    WHERE table_schema NOT IN ('pg_catalog', 'information_schema')
    ORDER BY table_schema, table_name
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        column_name::text AS column_name,
        data_type::text AS data_type,
        is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_name = $1
    ORDER BY table_schema, ordinal_position
"#;

#[async_trait]
impl SchemaIntrospection for PostgresConnection {
    async fn get_tables(&self) -> Result<Vec<TableInfo>> {
        let rows = self.fetch_all(TABLES_QUERY, &[]).await?;
        rows.iter().map(TableInfo::from_row).collect()
    }

    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDetail>> {
        let rows = self.fetch_all(COLUMNS_QUERY, &[Value::from(table)]).await?;
        rows.iter().map(ColumnDetail::from_row).collect()
    }
}
