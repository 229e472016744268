use crate::Error;
use std::fmt::{self, Display};

/// Failure categories of the statement lifecycle.
///
/// Attached to the native error as context, so the rendered chain reads
/// `"SQLite statement execution failed: <cause>"` and the category can be
/// recovered with `error.downcast_ref::<StatementError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// The native prepare call was rejected.
    Preparation { dialect: &'static str },
    /// The native execute or query call was rejected.
    Execution { dialect: &'static str },
    /// A dialect hook was invoked without a concrete implementation.
    NotImplemented { hook: &'static str },
    /// The native close or finalize call failed. Logged, never returned by `close`.
    ResourceRelease { dialect: &'static str },
    /// There is no open connection to prepare against.
    NotConnected { dialect: &'static str },
}

impl StatementError {
    pub fn into_error(self) -> Error {
        let error = Error::new(self);
        log::error!("{:#}", error);
        error
    }
    /// Wraps `cause` with this category and logs the result.
    pub fn wrap(self, cause: Error) -> Error {
        let error = cause.context(self);
        log::error!("{:#}", error);
        error
    }
}

impl Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparation { dialect } => write!(f, "{} statement preparation failed", dialect),
            Self::Execution { dialect } => write!(f, "{} statement execution failed", dialect),
            Self::NotImplemented { hook } => write!(f, "Statement hook `{}` is not implemented", hook),
            Self::ResourceRelease { dialect } => write!(f, "{} statement release failed", dialect),
            Self::NotConnected { dialect } => {
                write!(f, "{} statement cannot be prepared: not connected", dialect)
            }
        }
    }
}

impl std::error::Error for StatementError {}
