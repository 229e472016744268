use crate::{
    BoundParam, Driver, Error, ExecuteResult, FetchMode, FetchedRow, MutationSummary,
    NamedParams, ParamKey, Params, Prepared, QueryKind, QueryResult, Result, RowLabeled,
    StatementError, Value, rewrite_named, truncate_long,
};
use std::fmt::{self, Display};

/// A prepared statement bound to one dialect.
///
/// Created unprepared by `Connection::prepare`. `execute` prepares lazily, the result is
/// then available either as the returned value or through the cursor (`fetch`,
/// `fetch_all`, `fetch_column`, `fetch_row`). `close` releases the native resource.
///
/// Every lifecycle method takes `&mut self`: a statement has a single writer.
pub struct Statement<D: Driver> {
    driver: D,
    inner: D::Prepared,
    sql: String,
    positional: Vec<Value>,
    named: NamedParams,
    /// Slot of the first named parameter in `positional`.
    named_offset: usize,
    /// Number of named parameters turned into placeholders.
    named_rewritten: usize,
    /// Slot referenced by each placeholder, kept for dialects that cannot reuse a placeholder.
    occurrences: Option<Vec<usize>>,
    fetch_mode: FetchMode,
    prepared: bool,
    rows: Vec<RowLabeled>,
    cursor: usize,
    summary: Option<MutationSummary>,
}

impl<D: Driver> Statement<D> {
    pub fn new(driver: D, inner: D::Prepared, sql: impl Into<String>) -> Self {
        Self {
            driver,
            inner,
            sql: sql.into(),
            positional: Vec::new(),
            named: NamedParams::new(),
            named_offset: 0,
            named_rewritten: 0,
            occurrences: None,
            fetch_mode: FetchMode::default(),
            prepared: false,
            rows: Vec::new(),
            cursor: 0,
            summary: None,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
    /// SQL text, with named parameters rewritten once the statement was prepared.
    pub fn sql(&self) -> &str {
        &self.sql
    }
    pub fn positional_params(&self) -> &[Value] {
        &self.positional
    }
    pub fn named_params(&self) -> &NamedParams {
        &self.named
    }
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }
    /// Dialect side of the statement.
    pub fn inner(&self) -> &D::Prepared {
        &self.inner
    }
    pub fn inner_mut(&mut self) -> &mut D::Prepared {
        &mut self.inner
    }

    /// Binds `value` to a positional index or to a name, with an advisory type.
    pub fn bind_param(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<Value>,
        ty: Option<&str>,
    ) -> &mut Self {
        match key.into() {
            ParamKey::Index(index) => {
                if self.positional.len() <= index {
                    self.positional.resize(index + 1, Value::Null);
                }
                self.positional[index] = value.into();
            }
            ParamKey::Name(name) => {
                let mut param = BoundParam::new(value);
                param.ty = ty.map(Into::into);
                self.named.insert(name, param);
            }
        }
        self
    }
    pub fn bind_value(&mut self, key: impl Into<ParamKey>, value: impl Into<Value>) -> &mut Self {
        self.bind_param(key, value, None)
    }
    pub fn bind_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<ParamKey>,
        V: Into<BoundParam>,
    {
        for (key, param) in params {
            let param = param.into();
            match key.into() {
                ParamKey::Index(index) => {
                    self.bind_param(index, param.value, param.ty.as_deref());
                }
                ParamKey::Name(name) => self.named.insert(name, param),
            }
        }
        self
    }
    pub fn set_fetch_mode(&mut self, mode: FetchMode) -> &mut Self {
        self.fetch_mode = mode;
        self
    }

    /// Rewrites the named parameters and runs the dialect preparation, once.
    ///
    /// With `?` placeholders, the slots of the `?` come first and the named values follow,
    /// so positional values may still be bound after preparation.
    pub async fn prepare(&mut self) -> Result<()> {
        if self.prepared {
            return Ok(());
        }
        self.rewrite();
        log::debug!(
            "Preparing {} statement:\n{}",
            D::DISPLAY_NAME,
            truncate_long!(&self.sql)
        );
        self.inner.prepare(&self.sql).await?;
        self.prepared = true;
        Ok(())
    }

    fn rewrite(&mut self) {
        if self.named_rewritten > 0 || self.named.is_empty() {
            return;
        }
        if !D::NUMBERED_PLACEHOLDERS {
            // Every `?` owns a slot ahead of the named ones, bound now or later.
            let glyphs = self.sql.matches('?').count();
            if self.positional.len() < glyphs {
                self.positional.resize(glyphs, Value::Null);
            }
        }
        let driver = &self.driver;
        let rewritten = rewrite_named(&self.sql, &self.positional, &self.named, |i| {
            driver.placeholder(i)
        });
        self.named_offset = self.positional.len();
        self.named_rewritten = self.named.len();
        self.sql = rewritten.sql;
        self.positional = rewritten.values;
        if !D::NUMBERED_PLACEHOLDERS {
            self.occurrences = Some(rewritten.occurrences);
        }
    }

    /// Copies the current named values into their slots.
    fn project_named(&mut self) -> Result<()> {
        for (i, (name, param)) in self.named.iter().enumerate() {
            if i >= self.named_rewritten {
                let error = Error::msg(format!(
                    "Named parameter `:{}` was bound after the statement was prepared",
                    name
                ));
                log::error!("{:#}", error);
                return Err(error);
            }
            let slot = self.named_offset + i;
            if self.positional.len() <= slot {
                self.positional.resize(slot + 1, Value::Null);
            }
            self.positional[slot] = param.value.clone();
        }
        Ok(())
    }

    /// Values in the order the native client expects them.
    fn wire_params(&self) -> Result<Vec<Value>> {
        let Some(occurrences) = &self.occurrences else {
            return Ok(self.positional.clone());
        };
        occurrences
            .iter()
            .map(|i| {
                self.positional.get(*i).cloned().ok_or_else(|| {
                    let error = Error::msg(format!(
                        "Positional parameter {} has no value, {} were bound",
                        i + 1,
                        self.positional.len()
                    ));
                    log::error!("{:#}", error);
                    error
                })
            })
            .collect()
    }

    /// Executes with the parameters bound so far.
    pub async fn execute(&mut self) -> Result<ExecuteResult> {
        self.prepare().await?;
        self.project_named()?;
        let params = self.wire_params()?;
        let kind = QueryKind::of(&self.sql);
        self.rows.clear();
        self.cursor = 0;
        self.summary = None;
        log::debug!(
            "Executing {} statement with {} parameters:\n{}",
            D::DISPLAY_NAME,
            params.len(),
            truncate_long!(&self.sql)
        );
        match self.inner.execute(kind, &self.sql, params).await? {
            QueryResult::Rows(rows) => {
                self.rows = rows;
                Ok(ExecuteResult::Rows(
                    self.rows
                        .iter()
                        .map(|row| FetchedRow::format(row.clone(), self.fetch_mode))
                        .collect(),
                ))
            }
            QueryResult::Affected(summary) => {
                self.summary = Some(summary.clone());
                Ok(ExecuteResult::Mutation(summary))
            }
        }
    }

    /// Executes after replacing the positional values or merging the named ones.
    pub async fn execute_with(&mut self, params: impl Into<Params>) -> Result<ExecuteResult> {
        match params.into() {
            Params::Positional(values) => self.positional = values,
            Params::Named(named) => {
                self.bind_params(named);
            }
        }
        self.execute().await
    }

    /// Next row, or `None` once the result is exhausted.
    pub fn fetch(&mut self) -> Option<FetchedRow> {
        let row = self.rows.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(FetchedRow::format(row, self.fetch_mode))
    }

    /// Remaining rows, moving the cursor to the end.
    pub fn fetch_all(&mut self) -> Vec<FetchedRow> {
        let rows = self.rows[self.cursor..]
            .iter()
            .map(|row| FetchedRow::format(row.clone(), self.fetch_mode))
            .collect();
        self.cursor = self.rows.len();
        rows
    }

    /// Value at column `index` of the next row, advancing the cursor by one row.
    ///
    /// The index is applied to the full row, whatever the fetch mode. An index out of range
    /// fails without advancing.
    pub fn fetch_column(&mut self, index: usize) -> Result<Option<Value>> {
        let Some(row) = self.rows.get(self.cursor) else {
            return Ok(None);
        };
        let Some(value) = row.values.get(index) else {
            let error = Error::msg(format!(
                "Column index {} is out of range for a row of {} columns",
                index,
                row.len()
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let value = value.clone();
        self.cursor += 1;
        Ok(Some(value))
    }

    /// First of the remaining rows, the cursor is moved to the end.
    pub fn fetch_row(&mut self) -> Option<FetchedRow> {
        self.fetch_all().into_iter().next()
    }

    /// Rows changed by the last write, or rows returned by the last read.
    pub fn row_count(&self) -> u64 {
        match &self.summary {
            Some(summary) => summary.row_count,
            None => self.rows.len() as u64,
        }
    }
    pub fn last_insert_id(&self) -> Option<&Value> {
        self.summary.as_ref()?.insert_id.as_ref()
    }
    pub fn summary(&self) -> Option<&MutationSummary> {
        self.summary.as_ref()
    }

    /// Releases the native resource and clears the result.
    ///
    /// A release failure is logged and the statement is closed anyway.
    pub async fn close(&mut self) {
        if let Err(e) = self.inner.close().await {
            let e = e.context(StatementError::ResourceRelease {
                dialect: D::DISPLAY_NAME,
            });
            log::warn!("{:#}", e);
        }
        self.prepared = false;
        self.rows.clear();
        self.cursor = 0;
        self.summary = None;
    }
}

impl<D: Driver> Display for Statement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(&self.sql))
    }
}
