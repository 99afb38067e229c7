//! MySQL type conversion utilities.
//!
//! This module handles conversion between MySQL-specific types (from SQLx)
//! and the generic `Value` type used across all database drivers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlColumn, MySqlRow, MySqlSslMode};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef};

use crate::database::traits::{Cell, Row as TraitRow, SslMode, Value};

pub(crate) type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Converter between MySQL values and the unified `Value` type.
pub struct MySqlValueConverter;

impl MySqlValueConverter {
    /// Bind every parameter, in order, to `?` placeholders.
    pub fn bind_all<'q>(query: MySqlQuery<'q>, params: &[Value]) -> MySqlQuery<'q> {
        params.iter().fold(query, Self::bind_value)
    }

    pub fn bind_value<'q>(query: MySqlQuery<'q>, value: &Value) -> MySqlQuery<'q> {
        match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int16(v) => query.bind(*v),
            Value::Int32(v) => query.bind(*v),
            Value::Int64(v) => query.bind(*v),
            Value::Float32(v) => query.bind(*v),
            Value::Float64(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Bytes(v) => query.bind(v.clone()),
            Value::Date(v) => query.bind(*v),
            Value::Time(v) => query.bind(*v),
            Value::DateTime(v) => query.bind(*v),
            Value::DateTimeTz(v) => query.bind(*v),
            Value::Decimal(v) => query.bind(*v),
            Value::Uuid(v) => query.bind(*v),
            Value::Other { display, .. } => query.bind(display.clone()),
        }
    }

    /// Convert a MySQL row to a trait Row.
    pub fn convert_row(mysql_row: &MySqlRow) -> TraitRow {
        let cells = mysql_row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let value = Self::extract_value(mysql_row, col, idx);
                Cell::new(value, col.name().to_string())
            })
            .collect();

        TraitRow::new(cells)
    }

    fn extract_value(row: &MySqlRow, column: &MySqlColumn, index: usize) -> Value {
        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Err(_) => return Value::Null,
            _ => {}
        }

        let type_name = column.type_info().name();
        Self::decode_by_type(row, index, type_name)
    }

    /// Decode a value based on its MySQL type name.
    fn decode_by_type(row: &MySqlRow, index: usize, type_name: &str) -> Value {
        match type_name {
            // Boolean (MySQL uses TINYINT(1) for booleans)
            "BOOLEAN" | "BOOL" => row
                .try_get::<bool, _>(index)
                .map(Value::Bool)
                .unwrap_or(Value::Null),

            // Integers
            "TINYINT" => row
                .try_get::<i8, _>(index)
                .map(|v| Value::Int16(v as i16))
                .unwrap_or(Value::Null),

            "TINYINT UNSIGNED" => row
                .try_get::<u8, _>(index)
                .map(|v| Value::Int16(v as i16))
                .unwrap_or(Value::Null),

            "SMALLINT" => row
                .try_get::<i16, _>(index)
                .map(Value::Int16)
                .unwrap_or(Value::Null),

            "SMALLINT UNSIGNED" => row
                .try_get::<u16, _>(index)
                .map(|v| Value::Int32(v as i32))
                .unwrap_or(Value::Null),

            "MEDIUMINT" | "INT" | "INTEGER" => row
                .try_get::<i32, _>(index)
                .map(Value::Int32)
                .unwrap_or(Value::Null),

            "MEDIUMINT UNSIGNED" | "INT UNSIGNED" | "INTEGER UNSIGNED" => row
                .try_get::<u32, _>(index)
                .map(|v| Value::Int64(v as i64))
                .unwrap_or(Value::Null),

            "BIGINT" => row
                .try_get::<i64, _>(index)
                .map(Value::Int64)
                .unwrap_or(Value::Null),

            // Does not fit i64 in general
            "BIGINT UNSIGNED" => row
                .try_get::<u64, _>(index)
                .map(|v| Value::Decimal(Decimal::from(v)))
                .unwrap_or(Value::Null),

            // Floating point
            "FLOAT" => row
                .try_get::<f32, _>(index)
                .map(Value::Float32)
                .unwrap_or(Value::Null),

            "DOUBLE" | "DOUBLE PRECISION" | "REAL" => row
                .try_get::<f64, _>(index)
                .map(Value::Float64)
                .unwrap_or(Value::Null),

            "DECIMAL" | "NUMERIC" => row
                .try_get::<Decimal, _>(index)
                .map(Value::Decimal)
                .unwrap_or(Value::Null),

            // Text types
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => row
                .try_get::<String, _>(index)
                .map(Value::Text)
                .unwrap_or(Value::Null),

            // Binary types
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
                .try_get::<Vec<u8>, _>(index)
                .map(Value::Bytes)
                .unwrap_or(Value::Null),

            // Date/Time types
            "DATE" => row
                .try_get::<NaiveDate, _>(index)
                .map(Value::Date)
                .unwrap_or(Value::Null),

            "TIME" => row
                .try_get::<NaiveTime, _>(index)
                .map(Value::Time)
                .unwrap_or(Value::Null),

            "DATETIME" => row
                .try_get::<NaiveDateTime, _>(index)
                .map(Value::DateTime)
                .unwrap_or(Value::Null),

            // TIMESTAMP is stored in UTC and converted to the session zone.
            "TIMESTAMP" => row
                .try_get::<DateTime<Utc>, _>(index)
                .map(Value::DateTimeTz)
                .or_else(|_| row.try_get::<NaiveDateTime, _>(index).map(Value::DateTime))
                .unwrap_or(Value::Null),

            "YEAR" => row
                .try_get::<u16, _>(index)
                .map(|v| Value::Int16(v as i16))
                .unwrap_or(Value::Null),

            "JSON" => row
                .try_get::<serde_json::Value, _>(index)
                .map(|json| Value::Other {
                    type_name: type_name.to_string(),
                    display: json.to_string(),
                })
                .unwrap_or(Value::Null),

            _ => Self::decode_as_string_fallback(row, index, type_name),
        }
    }

    /// Fallback: try to decode as string representation for unknown types.
    fn decode_as_string_fallback(row: &MySqlRow, index: usize, type_name: &str) -> Value {
        if let Ok(s) = row.try_get_unchecked::<String, _>(index) {
            return Value::Other {
                type_name: type_name.to_string(),
                display: s,
            };
        }

        Value::Other {
            type_name: type_name.to_string(),
            display: "<unknown>".to_string(),
        }
    }

    /// Map the configured SSL mode onto MySQL's.
    pub fn map_ssl_mode(mode: &SslMode) -> MySqlSslMode {
        match mode {
            SslMode::Disable => MySqlSslMode::Disabled,
            SslMode::Prefer => MySqlSslMode::Preferred,
            SslMode::Require => MySqlSslMode::Required,
            SslMode::VerifyCa => MySqlSslMode::VerifyCa,
            SslMode::VerifyFull => MySqlSslMode::VerifyIdentity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(&SslMode::Disable),
            MySqlSslMode::Disabled
        ));
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(&SslMode::Prefer),
            MySqlSslMode::Preferred
        ));
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(&SslMode::VerifyFull),
            MySqlSslMode::VerifyIdentity
        ));
    }
}
