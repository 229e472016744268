use crate::ValueWrap;
use mysql_async::{Column, FromRowError, consts::ColumnType};
use stow_core::{Row, RowLabeled, RowNames, Value};

/// Character set id of binary columns.
const BINARY_CHARSET: u16 = 63;

pub(crate) struct RowWrap(pub(crate) RowLabeled);

/// Refines the protocol value using the column definition.
fn refine(value: Value, column: &Column) -> Value {
    match (value, column.column_type()) {
        (Value::Blob(v), ColumnType::MYSQL_TYPE_NEWDECIMAL | ColumnType::MYSQL_TYPE_DECIMAL) => {
            match std::str::from_utf8(&v).ok().and_then(|s| s.parse().ok()) {
                Some(decimal) => Value::Decimal(decimal),
                None => Value::Blob(v),
            }
        }
        (Value::Blob(v), _) if column.character_set() != BINARY_CHARSET => {
            match String::from_utf8(v.into_vec()) {
                Ok(text) => Value::Varchar(text),
                Err(e) => Value::Blob(e.into_bytes().into()),
            }
        }
        (Value::Timestamp(v), ColumnType::MYSQL_TYPE_DATE) => Value::Date(v.date()),
        (value, _) => value,
    }
}

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
        let mut values = Vec::with_capacity(row.len());
        for (i, column) in columns.iter().enumerate() {
            match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(value)) => values.push(refine(value.0, column)),
                _ => return Err(FromRowError(row)),
            }
        }
        let values: Row = values.into();
        Ok(RowWrap(RowLabeled::new(names, values)))
    }
}
