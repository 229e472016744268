mod bind;
mod cbox;
mod client;
mod completion;
mod connection;
mod driver;
mod extract;
mod native;
mod prepared;

pub(crate) use cbox::*;
pub use client::*;
pub use completion::*;
pub use connection::*;
pub use driver::*;
pub use native::*;
pub use prepared::*;
