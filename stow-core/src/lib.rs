mod as_value;
mod connection;
mod driver;
mod error;
mod params;
mod prepared;
mod query;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use params::*;
pub use prepared::*;
pub use query::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
