use crate::{DIALECT, MssqlClient, MssqlRequest, param_name};
use std::sync::Arc;
use stow_core::{
    MutationSummary, Prepared, QueryKind, QueryResult, Result, StatementError, Value,
    contains_keyword,
};

/// Statement side of MSSQL: a fresh request per execution, kept until the next one or `close`.
pub struct MssqlPrepared<C: MssqlClient> {
    client: Arc<C>,
    request: Option<C::Request>,
    id_column: Arc<str>,
}

impl<C: MssqlClient> MssqlPrepared<C> {
    pub fn new(client: Arc<C>, id_column: Arc<str>) -> Self {
        Self {
            client,
            request: None,
            id_column,
        }
    }
    pub fn request(&self) -> Option<&C::Request> {
        self.request.as_ref()
    }
}

impl<C: MssqlClient> Prepared for MssqlPrepared<C> {
    async fn prepare(&mut self, _sql: &str) -> Result<()> {
        if !self.client.is_connected() {
            return Err(StatementError::NotConnected { dialect: DIALECT }.into_error());
        }
        Ok(())
    }

    async fn execute(
        &mut self,
        kind: QueryKind,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<QueryResult> {
        self.request = None;
        let mut request = self
            .client
            .request()
            .map_err(|e| StatementError::Execution { dialect: DIALECT }.wrap(e))?;
        for (i, value) in params.into_iter().enumerate() {
            request.input(&param_name(i), value);
        }
        let request = self.request.insert(request);
        let result = request
            .query(sql)
            .await
            .map_err(|e| StatementError::Execution { dialect: DIALECT }.wrap(e))?;
        if kind.is_read() {
            return Ok(result.recordset.into());
        }
        let insert_id = if contains_keyword(sql, "OUTPUT") {
            result
                .recordset
                .first()
                .and_then(|v| v.get_column(&self.id_column))
                .cloned()
        } else {
            None
        };
        let row_count = result.rows_affected.first().copied().unwrap_or_default();
        Ok(MutationSummary::new(row_count, insert_id).into())
    }

    async fn close(&mut self) -> Result<()> {
        self.request = None;
        Ok(())
    }
}
