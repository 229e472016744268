use bytes::BytesMut;
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::error::Error;
use stow_core::Value;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use uuid::Uuid;

type BoxError = Box<dyn Error + Sync + Send>;

/// Bridges [`Value`] and the Postgres binary format.
///
/// Parameters are encoded after the type the server inferred for them, so an integer bound
/// to an `INT4` column is sent as 4 bytes.
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl From<Value> for ValueHolder {
    fn from(value: Value) -> Self {
        ValueHolder(value)
    }
}

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        Ok(ValueHolder(match *ty {
            Type::BOOL => Value::Boolean(bool::from_sql(ty, raw)?),
            Type::CHAR => Value::Int64(i8::from_sql(ty, raw)?.into()),
            Type::INT2 => Value::Int64(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int64(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int64(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int64(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float64(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float64(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
            Type::VARCHAR
            | Type::TEXT
            | Type::NAME
            | Type::BPCHAR
            | Type::JSON
            | Type::XML
            | Type::UNKNOWN => Value::Varchar(String::from_sql(ty, raw)?),
            Type::BYTEA => Value::Blob(Vec::<u8>::from_sql(ty, raw)?.into()),
            Type::DATE => Value::Date(Date::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(PrimitiveDateTime::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => {
                let v = OffsetDateTime::from_sql(ty, raw)?.to_offset(UtcOffset::UTC);
                Value::Timestamp(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Type::UUID => Value::Uuid(Uuid::from_sql(ty, raw)?),
            _ => {
                return Err(
                    stow_core::Error::msg(format!("Cannot decode sql type `{}`", ty)).into(),
                );
            }
        }))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(ValueHolder(Value::Null))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn integer_to_sql(v: i128, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::CHAR => i8::try_from(v)?.to_sql(ty, out),
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from_i128_with_scale(v, 0).to_sql(ty, out),
        Type::VARCHAR | Type::TEXT | Type::BPCHAR | Type::NAME => v.to_string().to_sql(ty, out),
        _ => i64::try_from(v)?.to_sql(ty, out),
    }
}

impl ToSql for ValueHolder {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match &self.0 {
            Value::Null => Ok(IsNull::Yes),
            Value::Boolean(v) => v.to_sql(ty, out),
            Value::Int64(v) => integer_to_sql(*v as i128, ty, out),
            Value::UInt64(v) => integer_to_sql(*v as i128, ty, out),
            Value::Float64(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::from_f64(*v)
                    .ok_or_else(|| stow_core::Error::msg(format!("{} is not a valid NUMERIC", v)))?
                    .to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Decimal(v) => match *ty {
                Type::FLOAT4 | Type::FLOAT8 => v
                    .to_f64()
                    .ok_or_else(|| stow_core::Error::msg(format!("{} is not a valid DOUBLE", v)))?
                    .to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Varchar(v) => v.to_sql(ty, out),
            Value::Blob(v) => v.as_ref().to_sql(ty, out),
            Value::Date(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMPTZ => v.assume_utc().to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Uuid(v) => match *ty {
                Type::VARCHAR | Type::TEXT | Type::BPCHAR => v.to_string().to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}
