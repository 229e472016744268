use crate::{MySqlClient, MySqlNative, MySqlPrepared};
use std::{fmt, marker::PhantomData};
use stow_core::Driver;

pub(crate) const DIALECT: &str = "MySQL";

/// Dialect with `?` placeholders and server side prepared handles.
pub struct MySqlDriver<C = MySqlNative>(PhantomData<fn() -> C>);

impl<C> MySqlDriver<C> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for MySqlDriver<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for MySqlDriver<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for MySqlDriver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MySqlDriver")
    }
}

impl<C: MySqlClient> Driver for MySqlDriver<C> {
    type Prepared = MySqlPrepared<C>;

    const NAME: &'static str = "mysql";
    const DISPLAY_NAME: &'static str = DIALECT;
    const NUMBERED_PLACEHOLDERS: bool = false;

    fn placeholder(&self, _index: usize) -> String {
        "?".into()
    }
}
