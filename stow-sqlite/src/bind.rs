use libsqlite3_sys::*;
use rust_decimal::prelude::ToPrimitive;
use std::ffi::{c_char, c_int, c_void};
use stow_core::{Error, ErrorContext, Result, Value};

fn bind_text(statement: *mut sqlite3_stmt, index: c_int, text: &str) -> c_int {
    unsafe {
        sqlite3_bind_text(
            statement,
            index,
            text.as_ptr() as *const c_char,
            text.len() as c_int,
            SQLITE_TRANSIENT(),
        )
    }
}

/// Binds `value` to the 1-based parameter `index`.
pub(crate) fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: &Value) -> Result<()> {
    let rc = match value {
        Value::Null => unsafe { sqlite3_bind_null(statement, index) },
        Value::Boolean(v) => unsafe { sqlite3_bind_int(statement, index, *v as c_int) },
        Value::Int64(v) => unsafe { sqlite3_bind_int64(statement, index, *v) },
        Value::UInt64(v) => {
            let v = i64::try_from(*v).with_context(|| {
                format!("Cannot bind {} into a SQLite integer, it is out of bounds", v)
            })?;
            unsafe { sqlite3_bind_int64(statement, index, v) }
        }
        Value::Float64(v) => unsafe { sqlite3_bind_double(statement, index, *v) },
        Value::Decimal(v) => {
            let v = v.to_f64().ok_or_else(|| {
                Error::msg(format!("Cannot convert the Decimal value `{}` to f64", v))
            })?;
            unsafe { sqlite3_bind_double(statement, index, v) }
        }
        Value::Varchar(v) => bind_text(statement, index, v),
        Value::Blob(v) => unsafe {
            sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr() as *const c_void,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            )
        },
        Value::Date(v) => bind_text(statement, index, &v.to_string()),
        Value::Timestamp(v) => bind_text(statement, index, &v.to_string()),
        Value::Uuid(v) => bind_text(statement, index, &v.to_string()),
    };
    if rc != SQLITE_OK {
        let message = crate::native::error_message(unsafe { sqlite3_db_handle(statement) });
        return Err(Error::msg(message).context(format!("Cannot bind parameter {}", index)));
    }
    Ok(())
}
