//! SQLite type conversion utilities.
//!
//! This module handles conversion between SQLite types (from SQLx)
//! and the generic `Value` type used across all database drivers, in both
//! directions: decoding result rows and binding query parameters.
//!
//! SQLite uses dynamic typing with type affinity:
//! - INTEGER: 64-bit signed integer
//! - REAL: 64-bit floating point
//! - TEXT: UTF-8 string
//! - BLOB: Binary data
//! - NULL: Null value

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteColumn, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

use crate::database::traits::{Cell, Row as TraitRow, Value};

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Converter between SQLite values and the unified `Value` type.
pub struct SqliteValueConverter;

impl SqliteValueConverter {
    /// Bind every parameter, in order, to `?` / `?N` placeholders.
    pub fn bind_all<'q>(query: SqliteQuery<'q>, params: &[Value]) -> SqliteQuery<'q> {
        params.iter().fold(query, Self::bind_value)
    }

    /// Bind one parameter.
    ///
    /// SQLite has no native decimal or UUID storage, so those bind as text.
    pub fn bind_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
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
            Value::Decimal(v) => query.bind(v.to_string()),
            Value::Uuid(v) => query.bind(v.to_string()),
            Value::Other { display, .. } => query.bind(display.clone()),
        }
    }

    /// Convert a SQLite row to a trait Row.
    pub fn convert_row(sqlite_row: &SqliteRow) -> TraitRow {
        let cells = sqlite_row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let value = Self::extract_value(sqlite_row, col, idx);
                Cell::new(value, col.name().to_string())
            })
            .collect();

        TraitRow::new(cells)
    }

    /// Extract a value from a SQLite row at the given column index.
    fn extract_value(row: &SqliteRow, column: &SqliteColumn, index: usize) -> Value {
        // Check for NULL first
        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Err(_) => return Value::Null,
            _ => {}
        }

        let type_name = column.type_info().name().to_uppercase();
        Self::decode_by_type(row, index, &type_name)
    }

    /// Decode a value based on its declared SQLite type name.
    fn decode_by_type(row: &SqliteRow, index: usize, type_name: &str) -> Value {
        match type_name {
            "INTEGER" | "INT" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "BIGINT"
            | "UNSIGNED BIG INT" | "INT2" | "INT8" => row
                .try_get::<i64, _>(index)
                .map(Value::Int64)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            // Boolean (SQLite stores as 0/1 integer)
            "BOOLEAN" | "BOOL" => row
                .try_get::<bool, _>(index)
                .map(Value::Bool)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "FLOAT" => row
                .try_get::<f64, _>(index)
                .map(Value::Float64)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            "BLOB" => row
                .try_get::<Vec<u8>, _>(index)
                .map(Value::Bytes)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            "DATE" => row
                .try_get::<NaiveDate, _>(index)
                .map(Value::Date)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            "TIME" => row
                .try_get::<NaiveTime, _>(index)
                .map(Value::Time)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            // Only ISO-8601 text is a timestamp. Numbers in a DATETIME
            // column stay numbers.
            "DATETIME" | "TIMESTAMP" if Self::is_text(row, index) => row
                .try_get::<DateTime<Utc>, _>(index)
                .map(Value::DateTimeTz)
                .unwrap_or_else(|_| Self::decode_unknown(row, index, type_name)),

            "NUMERIC" | "DECIMAL" => Self::decode_numeric(row, index, type_name),

            _ => Self::decode_unknown(row, index, type_name),
        }
    }

    /// Whether the stored value's storage class is TEXT.
    fn is_text(row: &SqliteRow, index: usize) -> bool {
        row.try_get_raw(index)
            .map(|raw| raw.type_info().name() == "TEXT")
            .unwrap_or(false)
    }

    /// Decode a NUMERIC/DECIMAL value, keeping text precision when possible.
    fn decode_numeric(row: &SqliteRow, index: usize, type_name: &str) -> Value {
        if let Ok(s) = row.try_get::<String, _>(index) {
            return match s.parse::<Decimal>() {
                Ok(decimal) => Value::Decimal(decimal),
                Err(_) => Value::Text(s),
            };
        }

        Self::decode_unknown(row, index, type_name)
    }

    /// Decode by the storage class of the value itself.
    fn decode_unknown(row: &SqliteRow, index: usize, type_name: &str) -> Value {
        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Value::Int64(v);
        }
        if let Ok(v) = row.try_get::<f64, _>(index) {
            return Value::Float64(v);
        }
        if let Ok(v) = row.try_get::<String, _>(index) {
            return Value::Text(v);
        }
        if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
            return Value::Bytes(v);
        }

        Value::Other {
            type_name: type_name.to_string(),
            display: "<unknown>".to_string(),
        }
    }
}
