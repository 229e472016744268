mod client;
mod connection;
mod driver;
mod native;
mod prepared;
mod row_wrap;
mod value_wrap;

pub use client::*;
pub use connection::*;
pub use driver::*;
pub use native::*;
pub use prepared::*;
pub(crate) use row_wrap::*;
pub(crate) use value_wrap::*;
