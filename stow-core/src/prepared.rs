use crate::{QueryKind, QueryResult, Result, StatementError, Value};
use std::future::Future;

/// Dialect hooks behind a [`Statement`](crate::Statement).
///
/// An implementation owns whatever native resource the dialect needs (a prepared handle,
/// a request object, or nothing) and translates it into the shared lifecycle:
/// * `prepare` receives the SQL after named parameters were rewritten, it must check
///   that the native client is connected before anything else.
/// * `execute` receives the values in placeholder order and the [`QueryKind`] of the
///   statement, and reports rows for reads and a summary for writes.
/// * `close` releases the native resource. Errors are logged by the caller.
///
/// Native failures must be wrapped with [`StatementError::Preparation`] or
/// [`StatementError::Execution`] tagged with the dialect.
///
/// The provided bodies fail with [`StatementError::NotImplemented`].
pub trait Prepared: Send {
    fn prepare(&mut self, _sql: &str) -> impl Future<Output = Result<()>> + Send {
        async {
            Err(StatementError::NotImplemented { hook: "prepare" }.into_error())
        }
    }

    fn execute(
        &mut self,
        _kind: QueryKind,
        _sql: &str,
        _params: Vec<Value>,
    ) -> impl Future<Output = Result<QueryResult>> + Send {
        async {
            Err(StatementError::NotImplemented { hook: "execute" }.into_error())
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<()>> + Send {
        async { Err(StatementError::NotImplemented { hook: "close" }.into_error()) }
    }
}
