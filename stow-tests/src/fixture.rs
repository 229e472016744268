use indoc::indoc;
use stow::{Connection, Value};

/// Dialect specific statements of the `users` table used by the shared scenarios.
pub struct UsersFixture {
    pub create_table: &'static str,
    /// Inserts `:name` letting the database generate the id, and reports the id back.
    pub insert: &'static str,
}

impl UsersFixture {
    pub const MYSQL: UsersFixture = UsersFixture {
        create_table: indoc! {"
            CREATE TABLE users (
                id BIGINT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(64) NOT NULL
            )
        "},
        insert: "INSERT INTO users (name) VALUES (:name)",
    };
    pub const POSTGRES: UsersFixture = UsersFixture {
        create_table: indoc! {"
            CREATE TABLE users (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(64) NOT NULL
            )
        "},
        insert: "INSERT INTO users (name) VALUES (:name) RETURNING id",
    };
    pub const MSSQL: UsersFixture = UsersFixture {
        create_table: indoc! {"
            CREATE TABLE users (
                id BIGINT IDENTITY PRIMARY KEY,
                name NVARCHAR(64) NOT NULL
            )
        "},
        insert: "INSERT INTO users (name) OUTPUT INSERTED.id VALUES (:name)",
    };
    pub const SQLITE: UsersFixture = UsersFixture {
        create_table: indoc! {"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(64) NOT NULL
            )
        "},
        insert: "INSERT INTO users (name) VALUES (:name)",
    };
}

/// Rows present after [`seed`], ordered by id.
pub const SEEDED_USERS: [(i64, &str); 3] = [(5, "Alice"), (7, "Carol"), (9, "Dave")];

async fn run<C: Connection>(connection: &C, sql: &str, params: Vec<(&str, Value)>) {
    let mut statement = connection.prepare(sql);
    statement.bind_params(params);
    statement
        .execute()
        .await
        .unwrap_or_else(|e| panic!("Failed to run `{}`: {:#}", sql, e));
    statement.close().await;
}

/// Recreates the `users` table with [`SEEDED_USERS`].
pub async fn seed<C: Connection>(connection: &C, fixture: &UsersFixture) {
    run(connection, "DROP TABLE IF EXISTS users", vec![]).await;
    run(connection, fixture.create_table, vec![]).await;
    let mut statement = connection.prepare("INSERT INTO users (id, name) VALUES (:id, :name)");
    for (id, name) in SEEDED_USERS {
        statement
            .bind_value("id", id)
            .bind_value("name", name)
            .execute()
            .await
            .expect("Failed to insert a seeded user");
    }
    statement.close().await;
}
