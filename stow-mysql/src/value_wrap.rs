use stow_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => Value::Blob(v.into()),
            mysql_async::Value::Int(v) => Value::Int64(v),
            mysql_async::Value::UInt(v) => Value::UInt64(v),
            mysql_async::Value::Float(v) => Value::Float64(v.into()),
            mysql_async::Value::Double(v) => Value::Float64(v),
            mysql_async::Value::Date(year, month, day, hour, minute, second, micro) => {
                let date = Month::try_from(month)
                    .and_then(|month| Date::from_calendar_date(year as _, month, day))
                    .map_err(|_| mysql_async::FromValueError(value.clone()))?;
                let time = Time::from_hms_micro(hour, minute, second, micro)
                    .map_err(|_| mysql_async::FromValueError(value.clone()))?;
                Value::Timestamp(PrimitiveDateTime::new(date, time))
            }
            mysql_async::Value::Time(negative, days, hours, minutes, seconds, micro) => {
                let hours = days as u64 * 24 + hours as u64;
                Value::Varchar(format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    if negative { "-" } else { "" },
                    hours,
                    minutes,
                    seconds,
                    micro
                ))
            }
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySqlValue = mysql_async::Value;
        Ok(match value.0 {
            Value::Null => MySqlValue::NULL,
            Value::Boolean(v) => MySqlValue::from(v),
            Value::Int64(v) => MySqlValue::from(v),
            Value::UInt64(v) => MySqlValue::from(v),
            Value::Float64(v) => MySqlValue::from(v),
            Value::Decimal(v) => MySqlValue::from(v),
            Value::Varchar(v) => MySqlValue::from(v),
            Value::Blob(v) => MySqlValue::Bytes(v.into_vec()),
            Value::Date(v) => MySqlValue::from(v),
            Value::Timestamp(v) => {
                if !(0..=9999).contains(&v.year()) {
                    return Err(Error::msg(format!(
                        "Timestamp {} is out of range for MySQL",
                        v
                    )));
                }
                MySqlValue::Date(
                    v.year() as _,
                    v.month().into(),
                    v.day(),
                    v.hour(),
                    v.minute(),
                    v.second(),
                    v.microsecond(),
                )
            }
            Value::Uuid(v) => MySqlValue::from(v.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trip() {
        let value = mysql_async::Value::Date(2024, 2, 29, 23, 59, 1, 500);
        let wrapped = ValueWrap::try_from(value.clone()).expect("Valid MySQL date");
        assert!(matches!(wrapped.0, Value::Timestamp(..)));
        let back = mysql_async::Value::try_from(wrapped).expect("Valid timestamp");
        assert_eq!(back, value);
    }

    #[test]
    fn invalid_date() {
        let value = mysql_async::Value::Date(2023, 2, 30, 0, 0, 0, 0);
        assert!(ValueWrap::try_from(value).is_err());
    }

    #[test]
    fn time_as_text() {
        let value = mysql_async::Value::Time(true, 1, 2, 3, 4, 5);
        let wrapped = ValueWrap::try_from(value).expect("Valid MySQL time");
        assert_eq!(wrapped.0, Value::Varchar("-26:03:04.000005".into()));
    }
}
