use crate::{MssqlClient, MssqlPrepared};
use std::{fmt, marker::PhantomData};
use stow_core::Driver;

pub(crate) const DIALECT: &str = "MSSQL";

/// Dialect with named `@paramN` placeholders, numbered from 0.
pub struct MssqlDriver<C>(PhantomData<fn() -> C>);

impl<C> MssqlDriver<C> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for MssqlDriver<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for MssqlDriver<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for MssqlDriver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MssqlDriver")
    }
}

impl<C: MssqlClient> Driver for MssqlDriver<C> {
    type Prepared = MssqlPrepared<C>;

    const NAME: &'static str = "mssql";
    const DISPLAY_NAME: &'static str = DIALECT;
    const NUMBERED_PLACEHOLDERS: bool = true;

    fn placeholder(&self, index: usize) -> String {
        format!("@{}", param_name(index))
    }
}

/// Input name of the parameter at `index`, without the `@` sigil.
pub fn param_name(index: usize) -> String {
    format!("param{}", index)
}
