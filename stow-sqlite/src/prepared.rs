use crate::{Completion, DIALECT, SqliteClient, SqliteHandle};
use std::sync::Arc;
use stow_core::{
    Error, MutationSummary, Prepared, QueryKind, QueryResult, Result, StatementError, Value,
};

/// Statement side of SQLite: owns the native handle, every call is bridged from its callback.
pub struct SqlitePrepared<C: SqliteClient> {
    client: Arc<C>,
    handle: Option<C::Handle>,
}

impl<C: SqliteClient> SqlitePrepared<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            handle: None,
        }
    }
    pub fn handle(&self) -> Option<&C::Handle> {
        self.handle.as_ref()
    }
}

impl<C: SqliteClient> Prepared for SqlitePrepared<C> {
    async fn prepare(&mut self, sql: &str) -> Result<()> {
        if !self.client.is_open() {
            return Err(StatementError::NotConnected { dialect: DIALECT }.into_error());
        }
        let (callback, completion) = Completion::channel();
        self.client.prepare(sql, callback);
        let handle = completion
            .wait()
            .await
            .map_err(|e| StatementError::Preparation { dialect: DIALECT }.wrap(e))?;
        self.handle = Some(handle);
        Ok(())
    }

    async fn execute(
        &mut self,
        kind: QueryKind,
        _sql: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult> {
        let Some(handle) = &self.handle else {
            let error = Error::msg("SQLite statement was executed without a prepared handle");
            return Err(StatementError::Execution { dialect: DIALECT }.wrap(error));
        };
        let wrap = |e| StatementError::Execution { dialect: DIALECT }.wrap(e);
        if kind.is_read() {
            let (callback, completion) = Completion::channel();
            handle.all(params, callback);
            return Ok(completion.wait().await.map_err(wrap)?.into());
        }
        let (callback, completion) = Completion::for_run();
        handle.run(params, callback);
        let context = completion.wait().await.map_err(wrap)?;
        let insert_id = (context.last_id != 0).then_some(Value::Int64(context.last_id));
        Ok(MutationSummary::new(context.changes, insert_id).into())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            let (callback, completion) = Completion::channel();
            handle.finalize(callback);
            completion.wait().await?;
        }
        Ok(())
    }
}
