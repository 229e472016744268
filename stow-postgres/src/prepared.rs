use crate::{DIALECT, PostgresPool};
use std::sync::Arc;
use stow_core::{
    MutationSummary, Prepared, QueryKind, QueryResult, Result, StatementError, Value,
    contains_keyword,
};

/// Statement side of Postgres, stateless: the pool prepares on every query.
pub struct PostgresPrepared<P: PostgresPool> {
    pool: Arc<P>,
    id_column: Arc<str>,
}

impl<P: PostgresPool> PostgresPrepared<P> {
    pub fn new(pool: Arc<P>, id_column: Arc<str>) -> Self {
        Self { pool, id_column }
    }
}

impl<P: PostgresPool> Prepared for PostgresPrepared<P> {
    async fn prepare(&mut self, _sql: &str) -> Result<()> {
        if !self.pool.is_connected() {
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
        let result = self
            .pool
            .query(sql, params)
            .await
            .map_err(|e| StatementError::Execution { dialect: DIALECT }.wrap(e))?;
        if kind.is_read() {
            return Ok(result.rows.into());
        }
        let insert_id = if contains_keyword(sql, "RETURNING") {
            result
                .rows
                .first()
                .and_then(|v| v.get_column(&self.id_column))
                .cloned()
        } else {
            None
        };
        Ok(MutationSummary::new(result.row_count, insert_id).into())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
