// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversions between [quarry::Value] and the Postgres wire format.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quarry::{Row, Value};
use tokio_postgres::{
    Column,
    types::{FromSql, IsNull, ToSql, Type, to_sql_checked},
};
use uuid::Uuid;

use crate::pg_error::PgDriverError;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// A [Value] bound to a statement parameter.
///
/// The server reports each parameter's type when the statement is prepared, so the conversion is
/// chosen by that type: an integer bound to an `int2` parameter is narrowed (failing if it doesn't
/// fit), text bound to a `uuid` parameter is parsed, and so on.
#[derive(Debug)]
pub struct PgParam<'a>(pub &'a Value);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(value) => value.to_sql_checked(ty, out),
            Value::Int(value) => int_to_sql(*value, ty, out),
            Value::Float(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql_checked(ty, out),
                _ => value.to_sql_checked(ty, out),
            },
            Value::Text(value) => text_to_sql(value, ty, out),
            Value::Bytes(value) => (&value[..]).to_sql_checked(ty, out),
            Value::Json(value) => value.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql_checked(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql_checked(ty, out),
        Type::FLOAT4 => (value as f32).to_sql_checked(ty, out),
        Type::FLOAT8 => (value as f64).to_sql_checked(ty, out),
        Type::TEXT | Type::VARCHAR => value.to_string().to_sql_checked(ty, out),
        _ => value.to_sql_checked(ty, out),
    }
}

fn text_to_sql(value: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::UUID => Uuid::parse_str(value)?.to_sql_checked(ty, out),
        Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(value)?
            .with_timezone(&Utc)
            .to_sql_checked(ty, out),
        Type::TIMESTAMP => value.parse::<NaiveDateTime>()?.to_sql_checked(ty, out),
        Type::DATE => value.parse::<NaiveDate>()?.to_sql_checked(ty, out),
        Type::JSON | Type::JSONB => {
            serde_json::from_str::<serde_json::Value>(value)?.to_sql_checked(ty, out)
        }
        _ => value.to_sql_checked(ty, out),
    }
}

/// Convert a result row, keeping the column order of the statement
pub fn to_row(row: &tokio_postgres::Row) -> Result<Row, PgDriverError> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            column_value(row, index, column).map(|value| (column.name().to_owned(), value))
        })
        .collect()
}

fn column_value(
    row: &tokio_postgres::Row,
    index: usize,
    column: &Column,
) -> Result<Value, PgDriverError> {
    let value = match *column.type_() {
        Type::BOOL => get::<bool>(row, index)?.map(Value::from),
        Type::INT2 => get::<i16>(row, index)?.map(Value::from),
        Type::INT4 => get::<i32>(row, index)?.map(Value::from),
        Type::INT8 => get::<i64>(row, index)?.map(Value::from),
        Type::OID => get::<u32>(row, index)?.map(Value::from),
        Type::FLOAT4 => get::<f32>(row, index)?.map(Value::from),
        Type::FLOAT8 => get::<f64>(row, index)?.map(Value::from),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            get::<String>(row, index)?.map(Value::from)
        }
        Type::BYTEA => get::<Vec<u8>>(row, index)?.map(Value::from),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, index)?.map(Value::from),
        Type::UUID => get::<Uuid>(row, index)?.map(|uuid| Value::Text(uuid.to_string())),
        Type::TIMESTAMPTZ => {
            get::<DateTime<Utc>>(row, index)?.map(|ts| Value::Text(ts.to_rfc3339()))
        }
        Type::TIMESTAMP => get::<NaiveDateTime>(row, index)?
            .map(|ts| Value::Text(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        Type::DATE => get::<NaiveDate>(row, index)?.map(|date| Value::Text(date.to_string())),
        _ => {
            return Err(PgDriverError::UnsupportedType {
                column: column.name().to_owned(),
                ty: column.type_().clone(),
            });
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

fn get<'a, T: FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    index: usize,
) -> Result<Option<T>, PgDriverError> {
    Ok(row.try_get::<_, Option<T>>(index)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The encoded bytes, or `None` for SQL `NULL`
    fn encode(value: Value, ty: &Type) -> Result<Option<Vec<u8>>, BoxError> {
        let mut out = BytesMut::new();
        match PgParam(&value).to_sql_checked(ty, &mut out)? {
            IsNull::Yes => Ok(None),
            IsNull::No => Ok(Some(out.to_vec())),
        }
    }

    #[test]
    fn integers_follow_the_parameter_type() {
        assert_eq!(
            encode(Value::Int(5), &Type::INT4).unwrap(),
            Some(vec![0, 0, 0, 5])
        );
        assert_eq!(
            encode(Value::Int(5), &Type::INT8).unwrap(),
            Some(vec![0, 0, 0, 0, 0, 0, 0, 5])
        );
        assert_eq!(
            encode(Value::Int(7), &Type::TEXT).unwrap(),
            Some(b"7".to_vec())
        );
        assert!(encode(Value::Int(70_000), &Type::INT2).is_err());
    }

    #[test]
    fn text_is_parsed_for_typed_parameters() {
        let uuid = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            encode(Value::from(uuid), &Type::UUID).unwrap(),
            Some(Uuid::parse_str(uuid).unwrap().as_bytes().to_vec())
        );

        assert!(encode(Value::from("not a uuid"), &Type::UUID).is_err());
        assert!(encode(Value::from("2024-02-29"), &Type::DATE).is_ok());
        assert_eq!(
            encode(Value::from("Jennifer"), &Type::VARCHAR).unwrap(),
            Some(b"Jennifer".to_vec())
        );
    }

    #[test]
    fn null_and_mismatched_types() {
        assert_eq!(encode(Value::Null, &Type::INT4).unwrap(), None);
        assert!(encode(Value::Bool(true), &Type::INT4).is_err());
    }
}
