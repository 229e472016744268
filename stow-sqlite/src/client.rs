use stow_core::{Result, RowLabeled, Value};

/// Completion callback of a native call.
pub type Callback<T> = Box<dyn FnOnce(Result<T>) + Send>;

/// Completion callback of `run`, the context is only valid during the call.
pub type RunCallback = Box<dyn FnOnce(&RunContext, Result<()>) + Send>;

/// What the native client knows after running a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Rowid of the last inserted row.
    pub last_id: i64,
    /// Rows changed by the statement.
    pub changes: u64,
}

/// Prepared handle of a callback based client.
pub trait SqliteHandle: Send + Sync + 'static {
    /// Runs the statement and reports every row.
    fn all(&self, params: Vec<Value>, callback: Callback<Vec<RowLabeled>>);

    /// Runs the statement discarding the rows.
    fn run(&self, params: Vec<Value>, callback: RunCallback);

    fn finalize(self, callback: Callback<()>);
}

/// Native capability of a client reporting every outcome through callbacks.
pub trait SqliteClient: Send + Sync + 'static {
    type Handle: SqliteHandle;

    fn is_open(&self) -> bool;

    fn prepare(&self, sql: &str, callback: Callback<Self::Handle>);
}
