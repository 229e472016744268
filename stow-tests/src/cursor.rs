use crate::{SEEDED_USERS, UsersFixture, seed};
use stow::{Connection, Value};

const SELECT_ALL: &str = "SELECT id, name FROM users ORDER BY id";

pub async fn cursor_exhaustion<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare(SELECT_ALL);
    statement.execute().await.expect("Failed to select all");
    assert!(statement.fetch().is_some());
    assert_eq!(statement.fetch_all().len(), SEEDED_USERS.len() - 1);
    for _ in 0..3 {
        assert_eq!(statement.fetch(), None);
    }
    assert!(statement.fetch_all().is_empty());
    assert_eq!(statement.fetch_column(0).expect("Should not fail"), None);

    statement.execute().await.expect("Failed to select all again");
    let row = statement.fetch_row().expect("A new execute resets the cursor");
    assert_eq!(row.get(0), Some(&Value::Int64(SEEDED_USERS[0].0)));
    assert_eq!(statement.fetch(), None);
    statement.close().await;
}

pub async fn fetch_column_rows<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare(SELECT_ALL);
    statement.execute().await.expect("Failed to select all");
    for (_, name) in SEEDED_USERS {
        assert_eq!(
            statement.fetch_column(1).expect("Column 1 exists"),
            Some(Value::Varchar(name.into()))
        );
    }
    assert_eq!(statement.fetch_column(1).expect("Should not fail"), None);
    statement.close().await;
}

pub async fn close_resets<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare(SELECT_ALL);
    statement.execute().await.expect("Failed to select all");
    assert!(statement.is_prepared());
    assert_eq!(statement.row_count(), SEEDED_USERS.len() as u64);
    statement.close().await;
    assert!(!statement.is_prepared());
    assert_eq!(statement.row_count(), 0);
    assert!(statement.fetch_all().is_empty());
    assert_eq!(statement.fetch(), None);
    statement.close().await;
}
