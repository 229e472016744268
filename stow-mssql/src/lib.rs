mod client;
mod connection;
mod driver;
mod prepared;

pub use client::*;
pub use connection::*;
pub use driver::*;
pub use prepared::*;
