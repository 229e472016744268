use crate::{UsersFixture, seed, silent_logs};
use stow::{Connection, Driver, StatementError};

pub async fn failures_are_tagged<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let dialect = <C::Driver as Driver>::DISPLAY_NAME;
    let mut statement = connection.prepare("SELECT id FROM missing_table");
    let error;
    silent_logs! {
        error = statement.execute().await.expect_err("The table does not exist");
    }
    let kind = error
        .downcast_ref::<StatementError>()
        .expect("The error carries its category");
    assert!(
        *kind == StatementError::Preparation { dialect }
            || *kind == StatementError::Execution { dialect },
        "Unexpected error category: {:?}",
        kind
    );
    assert!(
        format!("{:#}", error).starts_with(&format!("{} statement", dialect)),
        "The message starts with the dialect: {:#}",
        error
    );
    silent_logs! {
        statement.close().await;
    }
}
