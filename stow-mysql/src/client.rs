use std::future::Future;
use stow_core::{Result, RowLabeled, Value};

/// What the native client reports after executing a prepared handle.
#[derive(Debug, Clone, PartialEq)]
pub enum MySqlResponse {
    /// The statement produced a result set.
    Rows(Vec<RowLabeled>),
    /// The statement produced an OK packet.
    Summary {
        affected_rows: u64,
        insert_id: Option<u64>,
    },
}

/// Native capability of a client with explicit server side prepared handles.
pub trait MySqlClient: Send + Sync + 'static {
    type Handle: Send + Sync;

    fn is_connected(&self) -> bool;

    fn prepare(&self, sql: &str) -> impl Future<Output = Result<Self::Handle>> + Send;

    /// Executes `handle` with one value per `?`, in textual order.
    fn execute(
        &self,
        handle: &Self::Handle,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<MySqlResponse>> + Send;

    fn close(&self, handle: Self::Handle) -> impl Future<Output = Result<()>> + Send;
}
