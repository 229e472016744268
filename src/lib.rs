//! Stow: one prepared statement lifecycle over MySQL, Postgres, MSSQL and SQLite clients.
//!
//! The dialects live in their own crates (`stow-mysql`, `stow-postgres`, `stow-mssql`,
//! `stow-sqlite`), each exposing a `Connection` whose `prepare` returns a [`Statement`].

pub use stow_core::*;
