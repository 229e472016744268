#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::borrow::Cow;
    use stow_core::{AsValue, QueryKind, Value, contains_keyword, strip_url_scheme};
    use time::{Date, Month, PrimitiveDateTime, Time};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Int64(0), Value::Null);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert!(i32::try_from_value(Value::Null).is_err());
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(true));
        assert_ne!(val, Value::Varchar("true".into()));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::Int64(0)).unwrap(), false);
        assert!(bool::try_from_value(Value::Float64(0.5)).is_err());
    }

    #[test]
    fn value_integers() {
        let val: Value = (-12i8).into();
        assert_eq!(val, Value::Int64(-12));
        assert_eq!(i8::try_from_value(val).unwrap(), -12);
        assert!(u8::try_from_value(Value::Int64(256)).is_err());
        assert!(u16::try_from_value(Value::Int64(-1)).is_err());
        assert_eq!(u64::MAX.as_value(), Value::UInt64(u64::MAX));
        assert!(i64::try_from_value(Value::UInt64(u64::MAX)).is_err());
        assert_eq!(Value::Int64(7), Value::UInt64(7));
        assert_ne!(Value::Int64(-7), Value::UInt64(7));
        assert_eq!(
            i32::try_from_value(Value::Decimal(Decimal::new(1200, 2))).unwrap(),
            12
        );
        assert!(i32::try_from_value(Value::Decimal(Decimal::new(1234, 2))).is_err());
    }

    #[test]
    fn value_floats() {
        assert_eq!(2.5f32.as_value(), Value::Float64(2.5));
        assert_eq!(f64::try_from_value(Value::Int64(3)).unwrap(), 3.0);
        assert_eq!(
            Decimal::try_from_value(Value::Varchar("1.25".into())).unwrap(),
            Decimal::new(125, 2)
        );
    }

    #[test]
    fn value_text_and_blob() {
        let val: Value = "hello".into();
        assert_eq!(val, Value::Varchar("hello".into()));
        assert_eq!(Cow::<str>::try_from_value(val).unwrap(), "hello");
        let val = vec![1u8, 2, 3].as_value();
        assert_eq!(val, Value::Blob([1, 2, 3].into()));
        assert_eq!(val.to_string(), "X'010203'");
        assert!(String::try_from_value(Value::Blob([0xff].into())).is_err());
        assert_eq!(Value::Varchar("it's".into()).to_string(), "'it''s'");
    }

    #[test]
    fn value_time_and_uuid() {
        let date = Date::from_calendar_date(2025, Month::March, 14).unwrap();
        assert_eq!(
            Date::try_from_value(Value::Varchar("2025-03-14".into())).unwrap(),
            date
        );
        let timestamp = PrimitiveDateTime::new(date, Time::from_hms(10, 30, 0).unwrap());
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Varchar("2025-03-14 10:30:00".into()))
                .unwrap(),
            timestamp
        );
        assert_eq!(Date::try_from_value(timestamp.as_value()).unwrap(), date);
        let uuid = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
        assert_eq!(
            Uuid::try_from_value(Value::Varchar(uuid.to_string())).unwrap(),
            uuid
        );
        assert_eq!(
            Uuid::try_from_value(Value::Blob(uuid.as_bytes().to_vec().into())).unwrap(),
            uuid
        );
    }

    #[test]
    fn query_kind() {
        assert_eq!(QueryKind::of("select 1"), QueryKind::Read);
        assert_eq!(QueryKind::of("\n  (SELECT 1) UNION (SELECT 2)"), QueryKind::Read);
        assert_eq!(
            QueryKind::of("WITH x AS (SELECT 1) SELECT * FROM x"),
            QueryKind::Read
        );
        assert_eq!(QueryKind::of("PRAGMA table_info(users)"), QueryKind::Read);
        assert_eq!(QueryKind::of("INSERT INTO t VALUES (1)"), QueryKind::Write);
        assert_eq!(QueryKind::of("selection"), QueryKind::Write);
        assert_eq!(QueryKind::of(""), QueryKind::Write);
    }

    #[test]
    fn url_and_keywords() {
        assert_eq!(
            strip_url_scheme("sqlite://:memory:", "sqlite", "SQLite").unwrap(),
            ":memory:"
        );
        assert!(strip_url_scheme("mysql://localhost", "postgres", "PostgreSQL").is_err());
        assert!(contains_keyword(
            "INSERT INTO t(a) VALUES ($1) returning id",
            "RETURNING"
        ));
        assert!(!contains_keyword("SELECT returning_id FROM t", "RETURNING"));
    }
}
