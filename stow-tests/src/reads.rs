use crate::{UsersFixture, seed};
use stow::{Connection, FetchMode, FetchedRow, Value};

pub async fn read_by_id<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let sql = format!(
        "SELECT id, name FROM users WHERE id = {}",
        connection.placeholder(0)
    );
    let mut statement = connection.prepare(sql);
    statement.bind_value(0usize, 5);
    statement.execute().await.expect("Failed to read user 5");
    let row = statement.fetch().expect("User 5 should be found");
    let row = row.as_record().expect("Default fetch mode is record");
    assert_eq!(row.names(), ["id", "name"]);
    assert_eq!(row.get_column("id"), Some(&Value::Int64(5)));
    assert_eq!(
        row.get_column("name"),
        Some(&Value::Varchar("Alice".into()))
    );
    assert_eq!(statement.fetch(), None);
    statement.close().await;
}

pub async fn duplicate_named<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement =
        connection.prepare("SELECT id, name FROM users WHERE id = :x AND id = :x");
    statement.bind_params([("x", 7)]);
    statement.prepare().await.expect("Failed to prepare");
    assert_eq!(
        statement.sql().matches(&connection.placeholder(0)).count(),
        2,
        "Both occurrences of `:x` should reference the first slot"
    );
    assert_eq!(statement.positional_params(), [Value::Int64(7)]);
    let result = statement.execute().await.expect("Failed to execute");
    let rows = result.rows().expect("A select returns rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(1), Some(&Value::Varchar("Carol".into())));
    statement.close().await;
}

pub async fn tuple_mode<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement = connection.prepare("SELECT id, name FROM users WHERE id = :id");
    statement
        .set_fetch_mode(FetchMode::Tuple)
        .bind_value("id", 5);
    statement.execute().await.expect("Failed to execute");
    assert_eq!(
        statement.fetch_all(),
        [FetchedRow::Tuple(
            [Value::Int64(5), Value::Varchar("Alice".into())].into()
        )]
    );

    statement.set_fetch_mode(FetchMode::Scalar);
    let result = statement.execute().await.expect("Failed to execute again");
    assert_eq!(
        result.rows().and_then(|v| v.first()),
        Some(&FetchedRow::Scalar(Value::Int64(5)))
    );
    statement.close().await;
}

pub async fn rewrite_determinism<C: Connection>(connection: &C, fixture: &UsersFixture) {
    seed(connection, fixture).await;
    let mut statement =
        connection.prepare("SELECT id, name FROM users WHERE name = :name AND id = :id");
    statement.bind_value("id", 7).bind_value("name", "Carol");
    statement.prepare().await.expect("Failed to prepare");
    assert_eq!(
        statement.sql(),
        format!(
            "SELECT id, name FROM users WHERE name = {} AND id = {}",
            connection.placeholder(1),
            connection.placeholder(0)
        )
    );
    assert_eq!(
        statement.positional_params(),
        [Value::Int64(7), Value::Varchar("Carol".into())]
    );
    statement.execute().await.expect("Failed to execute");
    assert_eq!(statement.row_count(), 1);
    assert_eq!(
        statement.fetch_column(0).expect("Column 0 exists"),
        Some(Value::Int64(7))
    );
    statement.close().await;
}
