mod client;
mod connection;
mod driver;
mod native;
mod prepared;
mod value_holder;

pub use client::*;
pub use connection::*;
pub use driver::*;
pub use native::*;
pub use prepared::*;
pub(crate) use value_holder::*;
