use std::future::Future;
use stow_core::{Result, RowLabeled, Value};

/// Result of a request: the first record set and the count of every statement in the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MssqlResult {
    pub recordset: Vec<RowLabeled>,
    pub rows_affected: Vec<u64>,
}

/// A single use request, parameters are bound by name before running it.
///
/// Dropping the request releases it.
pub trait MssqlRequest: Send + Sync + 'static {
    /// Binds `value` to `@name`.
    fn input(&mut self, name: &str, value: Value);

    fn query(&mut self, sql: &str) -> impl Future<Output = Result<MssqlResult>> + Send;
}

/// Native capability of a client creating request objects.
pub trait MssqlClient: Send + Sync + 'static {
    type Request: MssqlRequest;

    fn is_connected(&self) -> bool;

    fn request(&self) -> Result<Self::Request>;
}
