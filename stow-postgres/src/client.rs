use std::future::Future;
use stow_core::{Result, RowLabeled, Value};

/// Result of a pooled query: the returned rows and the count reported by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PgResult {
    pub rows: Vec<RowLabeled>,
    pub row_count: u64,
}

/// Native capability of a pooled client, every query is prepared by the driver itself.
pub trait PostgresPool: Send + Sync + 'static {
    fn is_connected(&self) -> bool;

    /// Runs `sql` with one value per `$n`, `params[0]` being `$1`.
    fn query(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<PgResult>> + Send;
}
