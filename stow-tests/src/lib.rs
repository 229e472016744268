mod cursor;
mod errors;
mod fake;
mod fixture;
mod reads;
mod writes;

pub use fake::*;
pub use fixture::*;

use crate::{
    cursor::{close_resets, cursor_exhaustion, fetch_column_rows},
    errors::failures_are_tagged,
    reads::{duplicate_named, read_by_id, rewrite_determinism, tuple_mode},
    writes::{insert_generated_id, mutation_summary},
};
use log::LevelFilter;
use std::env;
use stow::Connection;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every shared scenario against `connection`, each one starting from a freshly
/// seeded `users` table.
pub async fn execute_tests<C: Connection>(connection: &C, fixture: &UsersFixture) {
    read_by_id(connection, fixture).await;
    duplicate_named(connection, fixture).await;
    tuple_mode(connection, fixture).await;
    rewrite_determinism(connection, fixture).await;
    cursor_exhaustion(connection, fixture).await;
    fetch_column_rows(connection, fixture).await;
    close_resets(connection, fixture).await;
    insert_generated_id(connection, fixture).await;
    mutation_summary(connection, fixture).await;
    failures_are_tagged(connection, fixture).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
