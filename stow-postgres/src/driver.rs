use crate::{PostgresNative, PostgresPool, PostgresPrepared};
use std::{fmt, marker::PhantomData};
use stow_core::Driver;

pub(crate) const DIALECT: &str = "PostgreSQL";

/// Dialect with numbered `$n` placeholders, prepared implicitly by the driver on each call.
pub struct PostgresDriver<P = PostgresNative>(PhantomData<fn() -> P>);

impl<P> PostgresDriver<P> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<P> Default for PostgresDriver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for PostgresDriver<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for PostgresDriver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostgresDriver")
    }
}

impl<P: PostgresPool> Driver for PostgresDriver<P> {
    type Prepared = PostgresPrepared<P>;

    const NAME: &'static str = "postgres";
    const DISPLAY_NAME: &'static str = DIALECT;
    const NUMBERED_PLACEHOLDERS: bool = true;

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }
}
