#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };
    use stow_core::{Connection, Result, StatementError, Value};
    use stow_postgres::{PgResult, PostgresConnection, PostgresPool};
    use stow_tests::{FakeDatabase, UsersFixture, execute_tests, init_logs, seed, silent_logs};

    /// Pool over the fake database, counting the queries it receives.
    struct MockPool {
        database: Arc<FakeDatabase>,
        connected: AtomicBool,
        queries: AtomicUsize,
    }

    impl MockPool {
        fn new() -> Self {
            Self {
                database: FakeDatabase::new(),
                connected: AtomicBool::new(true),
                queries: AtomicUsize::new(0),
            }
        }
    }

    impl PostgresPool for MockPool {
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Relaxed)
        }
        async fn query(&self, sql: &str, params: Vec<Value>) -> Result<PgResult> {
            assert!(!sql.contains('?'), "Placeholders must be numbered");
            self.queries.fetch_add(1, Ordering::Relaxed);
            let outcome = self.database.run(sql, &params)?;
            let row_count = if outcome.has_rows {
                outcome.rows.len() as u64
            } else {
                outcome.affected_rows
            };
            Ok(PgResult {
                rows: outcome.rows,
                row_count,
            })
        }
    }

    #[tokio::test]
    async fn mock() {
        init_logs();
        let connection = PostgresConnection::new(MockPool::new());
        execute_tests(&connection, &UsersFixture::POSTGRES).await;
        assert!(connection.pool().queries.load(Ordering::Relaxed) > 0);
    }

    #[tokio::test]
    async fn prepare_does_not_query() {
        init_logs();
        let connection = PostgresConnection::new(MockPool::new());
        let mut statement = connection.prepare("SELECT id FROM users WHERE id = :id");
        statement.bind_value("id", 1);
        statement.prepare().await.expect("Could not prepare");
        assert_eq!(statement.sql(), "SELECT id FROM users WHERE id = $1");
        assert_eq!(connection.pool().queries.load(Ordering::Relaxed), 0);
        statement.close().await;
    }

    #[tokio::test]
    async fn not_connected() {
        init_logs();
        let connection = PostgresConnection::new(MockPool::new());
        connection.pool().connected.store(false, Ordering::Relaxed);
        let mut statement = connection.prepare("SELECT id, name FROM users");
        silent_logs! {
            let result = statement.execute().await;
            assert_eq!(
                result
                    .expect_err("Should not execute")
                    .downcast_ref::<StatementError>(),
                Some(&StatementError::NotConnected { dialect: "PostgreSQL" })
            );
        }
        assert_eq!(connection.pool().queries.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn custom_id_column() {
        init_logs();
        let connection = PostgresConnection::new(MockPool::new()).with_id_column("name");
        seed(&connection, &UsersFixture::POSTGRES).await;
        let mut statement =
            connection.prepare("INSERT INTO users (name) VALUES (:name) RETURNING id");
        statement.bind_value("name", "Erin");
        statement.execute().await.expect("Could not insert");
        assert_eq!(statement.row_count(), 1);
        assert_eq!(statement.last_insert_id(), None);

        let connection = PostgresConnection::from_pool(connection.pool().clone());
        let mut statement =
            connection.prepare("INSERT INTO users (name) VALUES (:name) RETURNING id");
        statement.bind_value("name", "Frank");
        statement.execute().await.expect("Could not insert");
        assert_eq!(statement.last_insert_id(), Some(&Value::Int64(11)));
    }

    #[tokio::test]
    async fn live() {
        init_logs();
        let Ok(url) = std::env::var("STOW_POSTGRES_TEST") else {
            log::warn!("Skipping the live Postgres test, STOW_POSTGRES_TEST is not set");
            return;
        };
        let connection = PostgresConnection::connect(&url)
            .await
            .expect("Could not connect to Postgres");
        execute_tests(&connection, &UsersFixture::POSTGRES).await;
    }

    #[tokio::test]
    async fn wrong_url() {
        init_logs();
        silent_logs! {
            assert!(PostgresConnection::connect("mysql://localhost:3306").await.is_err());
        }
    }
}
