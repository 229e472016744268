use crate::Value;
use std::sync::Arc;

/// Whether a statement produces rows or modifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Read,
    Write,
}

impl QueryKind {
    const READ_KEYWORDS: [&'static str; 7] = [
        "SELECT", "WITH", "SHOW", "EXPLAIN", "PRAGMA", "DESCRIBE", "VALUES",
    ];

    /// Classifies the statement by its leading keyword.
    pub fn of(sql: &str) -> Self {
        let sql = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        let keyword = sql
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        if Self::READ_KEYWORDS
            .iter()
            .any(|v| v.eq_ignore_ascii_case(keyword))
        {
            QueryKind::Read
        } else {
            QueryKind::Write
        }
    }
    pub fn is_read(&self) -> bool {
        *self == QueryKind::Read
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output shape of fetched rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Column name keyed rows.
    #[default]
    Record,
    /// Values in column order.
    Tuple,
    /// The first column only.
    Scalar,
}

/// A row formatted according to a [`FetchMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedRow {
    Record(RowLabeled),
    Tuple(Row),
    Scalar(Value),
}

impl FetchedRow {
    pub fn format(row: RowLabeled, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Record => FetchedRow::Record(row),
            FetchMode::Tuple => FetchedRow::Tuple(row.values),
            FetchMode::Scalar => {
                FetchedRow::Scalar(row.values.into_vec().into_iter().next().unwrap_or_default())
            }
        }
    }
    /// Value at `index`, whatever the shape. A scalar only has index 0.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            FetchedRow::Record(row) => row.values.get(index),
            FetchedRow::Tuple(values) => values.get(index),
            FetchedRow::Scalar(value) => (index == 0).then_some(value),
        }
    }
    pub fn as_record(&self) -> Option<&RowLabeled> {
        match self {
            FetchedRow::Record(row) => Some(row),
            _ => None,
        }
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MutationSummary {
    /// Rows reported by the native client for the statement.
    pub row_count: u64,
    /// Identifier generated by the statement, when the dialect can report it.
    pub insert_id: Option<Value>,
    /// Rows impacted by the statement.
    pub affected_rows: u64,
}

impl MutationSummary {
    pub fn new(rows: u64, insert_id: Option<Value>) -> Self {
        Self {
            row_count: rows,
            insert_id,
            affected_rows: rows,
        }
    }
}

/// What a dialect reports back after executing a statement.
#[derive(Debug)]
pub enum QueryResult {
    /// Materialized rows of a read statement.
    Rows(Vec<RowLabeled>),
    /// Summary of a write statement.
    Affected(MutationSummary),
}

impl From<MutationSummary> for QueryResult {
    fn from(value: MutationSummary) -> Self {
        QueryResult::Affected(value)
    }
}

impl From<Vec<RowLabeled>> for QueryResult {
    fn from(value: Vec<RowLabeled>) -> Self {
        QueryResult::Rows(value)
    }
}

/// Returned by `Statement::execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteResult {
    Rows(Vec<FetchedRow>),
    Mutation(MutationSummary),
}

impl ExecuteResult {
    pub fn rows(&self) -> Option<&[FetchedRow]> {
        match self {
            ExecuteResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }
    pub fn summary(&self) -> Option<&MutationSummary> {
        match self {
            ExecuteResult::Mutation(summary) => Some(summary),
            _ => None,
        }
    }
}
