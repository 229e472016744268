use crate::{SqliteClient, SqliteNative, SqlitePrepared};
use std::{fmt, marker::PhantomData};
use stow_core::Driver;

pub(crate) const DIALECT: &str = "SQLite";

/// Dialect with `?` placeholders over a callback based client.
pub struct SqliteDriver<C = SqliteNative>(PhantomData<fn() -> C>);

impl<C> SqliteDriver<C> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for SqliteDriver<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for SqliteDriver<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for SqliteDriver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SqliteDriver")
    }
}

impl<C: SqliteClient> Driver for SqliteDriver<C> {
    type Prepared = SqlitePrepared<C>;

    const NAME: &'static str = "sqlite";
    const DISPLAY_NAME: &'static str = DIALECT;
    const NUMBERED_PLACEHOLDERS: bool = false;

    fn placeholder(&self, _index: usize) -> String {
        "?".into()
    }
}
