use crate::{UsersFixture, seed};
use stow::{AsValue, Connection, ExecuteResult, Value};

pub async fn insert_generated_id<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare(fixture.insert);
    statement.bind_value("name", "Bob");
    let result = statement.execute().await.expect("Failed to insert Bob");
    let ExecuteResult::Mutation(summary) = result else {
        panic!("An insert reports a mutation summary");
    };
    assert_eq!(summary.row_count, 1);
    assert_eq!(summary.affected_rows, 1);
    let id = summary.insert_id.expect("The generated id is reported");
    assert_eq!(statement.last_insert_id(), Some(&id));
    let id = i64::try_from_value(id).expect("The id is an integer");
    statement.close().await;

    let mut statement = connection.prepare("SELECT name FROM users WHERE id = :id");
    statement.bind_value("id", id);
    statement.execute().await.expect("Failed to read Bob back");
    assert_eq!(
        statement.fetch_column(0).expect("Column 0 exists"),
        Some(Value::Varchar("Bob".into()))
    );
    statement.close().await;
}

pub async fn mutation_summary<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare("UPDATE users SET name = :name WHERE id >= :id");
    statement.bind_value("name", "Zed").bind_value("id", 7);
    let result = statement.execute().await.expect("Failed to update");
    assert_eq!(result.summary().map(|v| v.row_count), Some(2));
    assert_eq!(statement.row_count(), 2);
    assert_eq!(statement.fetch(), None);

    statement.bind_value("name", "Ann").bind_value("id", 9);
    statement.execute().await.expect("Failed to update again");
    assert_eq!(statement.row_count(), 1);
    statement.close().await;

    let mut statement = connection.prepare("DELETE FROM users WHERE id = :id");
    statement.bind_value("id", 5);
    statement.execute().await.expect("Failed to delete");
    assert_eq!(statement.row_count(), 1);
    assert_eq!(statement.summary().map(|v| v.affected_rows), Some(1));
    statement.bind_value("id", 5);
    statement.execute().await.expect("Failed to delete again");
    assert_eq!(statement.row_count(), 0);
    statement.close().await;
}
