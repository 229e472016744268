use crate::{
    CBox, Callback, DIALECT, RunCallback, RunContext, SqliteClient, SqliteDriver, SqliteHandle,
    bind::bind_value,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::*;
use std::{
    ffi::{CStr, CString, c_int},
    ptr,
    sync::{Arc, Mutex, MutexGuard},
};
use stow_core::{
    Driver, Error, ErrorContext, Result, RowLabeled, Value, strip_url_scheme, truncate_long,
};
use tokio::task::spawn_blocking;
use urlencoding::decode;

pub(crate) fn error_message(db: *mut sqlite3) -> String {
    unsafe {
        let message = sqlite3_errmsg(db);
        if message.is_null() {
            return "Unknown error (could not extract the error message)".into();
        }
        CStr::from_ptr(message).to_string_lossy().into_owned()
    }
}

// libsqlite3-sys omits this binding, the bundled library still exports it.
unsafe extern "C" {
    fn sqlite3_close_v2(db: *mut sqlite3) -> c_int;
}

fn close_connection(connection: *mut sqlite3) {
    unsafe {
        sqlite3_close_v2(connection);
    }
}

/// Milliseconds a statement waits for a locked database before failing.
pub const BUSY_TIMEOUT_MS: c_int = 1000;

/// Holds the connection mutex, other statements of the connection wait until it is dropped.
struct ConnectionLock(*mut sqlite3_mutex);

impl ConnectionLock {
    fn enter(db: *mut sqlite3) -> Self {
        unsafe {
            let mutex = sqlite3_db_mutex(db);
            sqlite3_mutex_enter(mutex);
            Self(mutex)
        }
    }
}

impl Drop for ConnectionLock {
    fn drop(&mut self) {
        unsafe {
            sqlite3_mutex_leave(self.0);
        }
    }
}

fn finalize_statement(statement: *mut sqlite3_stmt) {
    unsafe {
        sqlite3_finalize(statement);
    }
}

/// [`SqliteClient`] over the bundled SQLite library.
///
/// The connection is opened in serialized mode, blocking calls run on the blocking pool and
/// report through the callbacks.
pub struct SqliteNative {
    connection: Arc<CBox<sqlite3>>,
}

impl SqliteNative {
    /// Opens a `sqlite://` url, `sqlite://:memory:` being an in memory database.
    ///
    /// A query string makes it a SQLite URI filename (`sqlite://data.db?mode=rwc`).
    pub async fn open(url: &str) -> Result<Self> {
        let context = || format!("While trying to open `{}`", truncate_long!(url));
        let path =
            strip_url_scheme(url, SqliteDriver::<Self>::NAME, DIALECT).with_context(context)?;
        let filename = if path.contains('?') {
            format!("file:{}", path)
        } else {
            decode(path).with_context(context)?.into_owned()
        };
        let filename = CString::new(filename).with_context(context)?;
        let connection = spawn_blocking(move || {
            let mut connection = CBox::new(ptr::null_mut(), close_connection);
            let rc = unsafe {
                sqlite3_open_v2(
                    filename.as_ptr(),
                    &mut *connection,
                    SQLITE_OPEN_READWRITE
                        | SQLITE_OPEN_CREATE
                        | SQLITE_OPEN_URI
                        | SQLITE_OPEN_FULLMUTEX,
                    ptr::null(),
                )
            };
            if rc != SQLITE_OK {
                return Err(Error::msg(error_message(*connection)));
            }
            unsafe {
                sqlite3_busy_timeout(*connection, BUSY_TIMEOUT_MS);
            }
            Ok(connection)
        })
        .await
        .with_context(context)?
        .with_context(context)?;
        Ok(Self {
            connection: Arc::new(connection),
        })
    }
}

fn prepare_statement(connection: Arc<CBox<sqlite3>>, sql: &str) -> Result<SqliteStatement> {
    let db = **connection;
    let sql = CString::new(sql).context("Could not create a CString from the query")?;
    let mut statement = CBox::new(ptr::null_mut(), finalize_statement);
    let mut tail = ptr::null();
    let rc = unsafe { sqlite3_prepare_v2(db, sql.as_ptr(), -1, &mut *statement, &mut tail) };
    if rc != SQLITE_OK {
        return Err(Error::msg(error_message(db)));
    }
    if statement.is_null() {
        return Err(Error::msg("The query does not contain any statement"));
    }
    if !tail.is_null()
        && unsafe { CStr::from_ptr(tail) }
            .to_bytes()
            .iter()
            .any(|c| !c.is_ascii_whitespace())
    {
        return Err(Error::msg("Cannot prepare more than one statement at a time"));
    }
    Ok(SqliteStatement {
        statement: Arc::new(Mutex::new(statement)),
        connection,
    })
}

impl SqliteClient for SqliteNative {
    type Handle = SqliteStatement;

    fn is_open(&self) -> bool {
        !self.connection.is_null()
    }

    fn prepare(&self, sql: &str, callback: Callback<SqliteStatement>) {
        let connection = self.connection.clone();
        let sql = sql.to_owned();
        spawn_blocking(move || callback(prepare_statement(connection, &sql)));
    }
}

/// Prepared statement of [`SqliteNative`], finalized by `finalize`, or on drop.
pub struct SqliteStatement {
    // Dropped before the connection.
    statement: Arc<Mutex<CBox<sqlite3_stmt>>>,
    connection: Arc<CBox<sqlite3>>,
}

fn lock(statement: &Mutex<CBox<sqlite3_stmt>>) -> Result<MutexGuard<'_, CBox<sqlite3_stmt>>> {
    statement
        .lock()
        .map_err(|_| Error::msg("SQLite statement lock is poisoned"))
}

/// Binds `params` and steps to completion, calling `row` for every row. The statement is
/// reset afterwards.
fn step(
    statement: *mut sqlite3_stmt,
    params: &[Value],
    mut row: impl FnMut(*mut sqlite3_stmt) -> Result<()>,
) -> Result<()> {
    unsafe {
        sqlite3_reset(statement);
        sqlite3_clear_bindings(statement);
    }
    for (i, value) in params.iter().enumerate() {
        bind_value(statement, i as c_int + 1, value)?;
    }
    let result = loop {
        match unsafe { sqlite3_step(statement) } {
            SQLITE_ROW => {
                if let Err(e) = row(statement) {
                    break Err(e);
                }
            }
            SQLITE_DONE => break Ok(()),
            _ => {
                break Err(Error::msg(error_message(unsafe {
                    sqlite3_db_handle(statement)
                })));
            }
        }
    };
    unsafe {
        sqlite3_reset(statement);
    }
    result
}

fn fetch_rows(statement: *mut sqlite3_stmt, params: &[Value]) -> Result<Vec<RowLabeled>> {
    let count = unsafe { sqlite3_column_count(statement) };
    let labels = (0..count)
        .map(|i| extract_name(statement, i))
        .collect::<Result<Arc<[_]>>>()?;
    let mut rows = Vec::new();
    step(statement, params, |statement| {
        let values = (0..count)
            .map(|i| extract_value(statement, i))
            .collect::<Result<_>>()?;
        rows.push(RowLabeled::new(labels.clone(), values));
        Ok(())
    })?;
    Ok(rows)
}

impl SqliteHandle for SqliteStatement {
    fn all(&self, params: Vec<Value>, callback: Callback<Vec<RowLabeled>>) {
        let statement = self.statement.clone();
        spawn_blocking(move || {
            callback(lock(&statement).and_then(|statement| fetch_rows(**statement, &params)))
        });
    }

    fn run(&self, params: Vec<Value>, callback: RunCallback) {
        let connection = self.connection.clone();
        let statement = self.statement.clone();
        spawn_blocking(move || {
            let db = **connection;
            let mut context = RunContext::default();
            let result = lock(&statement).and_then(|statement| {
                let _connection = ConnectionLock::enter(db);
                let before = unsafe { sqlite3_total_changes(db) };
                step(**statement, &params, |_| Ok(()))?;
                unsafe {
                    context.changes = (sqlite3_total_changes(db) - before).max(0) as u64;
                    context.last_id = sqlite3_last_insert_rowid(db);
                }
                Ok(())
            });
            callback(&context, result);
        });
    }

    fn finalize(self, callback: Callback<()>) {
        spawn_blocking(move || {
            let result = lock(&self.statement).and_then(|mut statement| {
                let rc = unsafe { sqlite3_finalize(statement.take()) };
                if rc != SQLITE_OK {
                    return Err(Error::msg(error_message(**self.connection)));
                }
                Ok(())
            });
            callback(result);
        });
    }
}
