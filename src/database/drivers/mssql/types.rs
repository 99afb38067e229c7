//! SQL Server type conversion utilities.
//!
//! Converts between tiberius `ColumnData` and the generic `Value` type, and
//! turns `Value` parameters into boxed `ToSql` values for `@P1`, `@P2`, ...
//! placeholders.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use tiberius::{ColumnData, FromSql, ToSql};

use crate::database::traits::{Cell, Row as TraitRow, Value};

/// Converter between SQL Server values and the unified `Value` type.
pub struct MssqlValueConverter;

impl MssqlValueConverter {
    /// Convert parameters to owned `ToSql` values, in order.
    pub fn to_sql_params(params: &[Value]) -> Vec<Box<dyn ToSql>> {
        params.iter().map(Self::to_sql).collect()
    }

    fn to_sql(value: &Value) -> Box<dyn ToSql> {
        match value {
            Value::Null => Box::new(Option::<String>::None),
            Value::Bool(v) => Box::new(*v),
            Value::Int16(v) => Box::new(*v),
            Value::Int32(v) => Box::new(*v),
            Value::Int64(v) => Box::new(*v),
            Value::Float32(v) => Box::new(*v),
            Value::Float64(v) => Box::new(*v),
            Value::Text(v) => Box::new(v.clone()),
            Value::Bytes(v) => Box::new(v.clone()),
            Value::Date(v) => Box::new(*v),
            Value::Time(v) => Box::new(*v),
            Value::DateTime(v) => Box::new(*v),
            Value::DateTimeTz(v) => Box::new(*v),
            Value::Decimal(v) => Box::new(*v),
            Value::Uuid(v) => Box::new(*v),
            Value::Other { display, .. } => Box::new(display.clone()),
        }
    }

    /// Convert a tiberius row to a trait Row.
    pub fn convert_row(row: tiberius::Row) -> TraitRow {
        let names: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();

        let cells = names
            .into_iter()
            .zip(row)
            .map(|(name, data)| Cell::new(Self::convert_data(&data), name))
            .collect();

        TraitRow::new(cells)
    }

    /// Convert a single column value.
    pub fn convert_data(data: &ColumnData<'static>) -> Value {
        match data {
            ColumnData::U8(Some(v)) => Value::Int16(*v as i16),
            ColumnData::I16(Some(v)) => Value::Int16(*v),
            ColumnData::I32(Some(v)) => Value::Int32(*v),
            ColumnData::I64(Some(v)) => Value::Int64(*v),
            ColumnData::F32(Some(v)) => Value::Float32(*v),
            ColumnData::F64(Some(v)) => Value::Float64(*v),
            ColumnData::Bit(Some(v)) => Value::Bool(*v),
            ColumnData::String(Some(v)) => Value::Text(v.to_string()),
            ColumnData::Guid(Some(v)) => Value::Uuid(*v),
            ColumnData::Binary(Some(v)) => Value::Bytes(v.to_vec()),
            ColumnData::Numeric(Some(_)) => Self::decode::<Decimal>(data, Value::Decimal),
            ColumnData::DateTime(Some(_))
            | ColumnData::SmallDateTime(Some(_))
            | ColumnData::DateTime2(Some(_)) => {
                Self::decode::<NaiveDateTime>(data, Value::DateTime)
            }
            ColumnData::Date(Some(_)) => Self::decode::<NaiveDate>(data, Value::Date),
            ColumnData::Time(Some(_)) => Self::decode::<NaiveTime>(data, Value::Time),
            ColumnData::DateTimeOffset(Some(_)) => {
                Self::decode::<DateTime<Utc>>(data, Value::DateTimeTz)
            }
            ColumnData::Xml(Some(xml)) => Value::Other {
                type_name: "xml".to_string(),
                display: format!("{:?}", xml),
            },
            // Every remaining variant carries `None`
            _ => Value::Null,
        }
    }

    fn decode<'a, T>(data: &'a ColumnData<'static>, wrap: impl FnOnce(T) -> Value) -> Value
    where
        T: FromSql<'a>,
    {
        match T::from_sql(data) {
            Ok(Some(v)) => wrap(v),
            Ok(None) => Value::Null,
            Err(e) => Value::Other {
                type_name: "unknown".to_string(),
                display: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn test_convert_scalars() {
        assert_eq!(
            MssqlValueConverter::convert_data(&ColumnData::I32(Some(42))),
            Value::Int32(42)
        );
        assert_eq!(
            MssqlValueConverter::convert_data(&ColumnData::Bit(Some(true))),
            Value::Bool(true)
        );
        assert_eq!(
            MssqlValueConverter::convert_data(&ColumnData::String(Some(Cow::Borrowed("Auckland")))),
            Value::Text("Auckland".to_string())
        );
    }

    #[test]
    fn test_convert_nulls() {
        assert_eq!(
            MssqlValueConverter::convert_data(&ColumnData::String(None)),
            Value::Null
        );
        assert_eq!(
            MssqlValueConverter::convert_data(&ColumnData::I64(None)),
            Value::Null
        );
    }

    #[test]
    fn test_params_keep_order_and_count() {
        let params = MssqlValueConverter::to_sql_params(&[Value::Int32(1), Value::Null, Value::from("x")]);
        assert_eq!(params.len(), 3);
        assert!(matches!(params[0].to_sql(), ColumnData::I32(Some(1))));
        assert!(matches!(params[1].to_sql(), ColumnData::String(None)));
    }
}
