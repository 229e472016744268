use crate::{DIALECT, MySqlClient, MySqlResponse};
use std::sync::Arc;
use stow_core::{
    AsValue, Error, MutationSummary, Prepared, QueryKind, QueryResult, Result, StatementError,
    Value,
};

/// Statement side of MySQL: owns the server side prepared handle.
pub struct MySqlPrepared<C: MySqlClient> {
    client: Arc<C>,
    handle: Option<C::Handle>,
}

impl<C: MySqlClient> MySqlPrepared<C> {
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

impl<C: MySqlClient> Prepared for MySqlPrepared<C> {
    async fn prepare(&mut self, sql: &str) -> Result<()> {
        if !self.client.is_connected() {
            return Err(StatementError::NotConnected { dialect: DIALECT }.into_error());
        }
        let handle = self
            .client
            .prepare(sql)
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
            let error = Error::msg("MySQL statement was executed without a prepared handle");
            return Err(StatementError::Execution { dialect: DIALECT }.wrap(error));
        };
        let response = self
            .client
            .execute(handle, params)
            .await
            .map_err(|e| StatementError::Execution { dialect: DIALECT }.wrap(e))?;
        Ok(match (kind, response) {
            (QueryKind::Read, MySqlResponse::Rows(rows)) => rows.into(),
            (QueryKind::Read, MySqlResponse::Summary { .. }) => QueryResult::Rows(Vec::new()),
            (
                QueryKind::Write,
                MySqlResponse::Summary {
                    affected_rows,
                    insert_id,
                },
            ) => MutationSummary::new(affected_rows, insert_id.map(AsValue::as_value)).into(),
            (QueryKind::Write, MySqlResponse::Rows(rows)) => {
                MutationSummary::new(rows.len() as u64, None).into()
            }
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            self.client.close(handle).await?;
        }
        Ok(())
    }
}
