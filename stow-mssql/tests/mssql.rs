#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };
    use stow_core::{Connection, Error, Result, StatementError, Value};
    use stow_mssql::{MssqlClient, MssqlConnection, MssqlRequest, MssqlResult};
    use stow_tests::{FakeDatabase, UsersFixture, execute_tests, init_logs, seed, silent_logs};

    /// Request over the fake database, inputs are resolved by their `paramN` name.
    struct MockRequest {
        database: Arc<FakeDatabase>,
        inputs: Vec<(String, Value)>,
        live: Arc<AtomicUsize>,
        log: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl Drop for MockRequest {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::Relaxed);
        }
    }

    impl MssqlRequest for MockRequest {
        fn input(&mut self, name: &str, value: Value) {
            self.inputs.push((name.to_string(), value));
        }
        async fn query(&mut self, sql: &str) -> Result<MssqlResult> {
            let mut params = Vec::new();
            for (name, value) in &self.inputs {
                let index: usize = name
                    .strip_prefix("param")
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| Error::msg(format!("Unexpected input `{}`", name)))?;
                if params.len() <= index {
                    params.resize(index + 1, Value::Null);
                }
                params[index] = value.clone();
            }
            if let Ok(mut log) = self.log.lock() {
                log.push(self.inputs.iter().map(|(k, _)| k.clone()).collect());
            }
            let outcome = self.database.run(sql, &params)?;
            let affected = if outcome.has_rows {
                outcome.rows.len() as u64
            } else {
                outcome.affected_rows
            };
            Ok(MssqlResult {
                recordset: outcome.rows,
                rows_affected: vec![affected],
            })
        }
    }

    struct MockClient {
        database: Arc<FakeDatabase>,
        connected: AtomicBool,
        live: Arc<AtomicUsize>,
        log: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                database: FakeDatabase::new(),
                connected: AtomicBool::new(true),
                live: Default::default(),
                log: Default::default(),
            }
        }
        fn live_requests(&self) -> usize {
            self.live.load(Ordering::Relaxed)
        }
    }

    impl MssqlClient for MockClient {
        type Request = MockRequest;

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Relaxed)
        }
        fn request(&self) -> Result<MockRequest> {
            self.live.fetch_add(1, Ordering::Relaxed);
            Ok(MockRequest {
                database: self.database.clone(),
                inputs: Vec::new(),
                live: self.live.clone(),
                log: self.log.clone(),
            })
        }
    }

    #[tokio::test]
    async fn mock() {
        init_logs();
        let connection = MssqlConnection::new(MockClient::new());
        execute_tests(&connection, &UsersFixture::MSSQL).await;
        assert_eq!(
            connection.client().live_requests(),
            0,
            "Every request should be released"
        );
    }

    #[tokio::test]
    async fn inputs_every_execute() {
        init_logs();
        let connection = MssqlConnection::new(MockClient::new());
        seed(&connection, &UsersFixture::MSSQL).await;
        let mut statement =
            connection.prepare("SELECT name FROM users WHERE id >= :low AND id <= :high");
        statement.bind_value("low", 5).bind_value("high", 7);
        statement.execute().await.expect("Could not execute");
        assert_eq!(
            statement.sql(),
            "SELECT name FROM users WHERE id >= @param0 AND id <= @param1"
        );
        assert_eq!(statement.row_count(), 2);
        assert_eq!(connection.client().live_requests(), 1);
        statement.bind_value("low", 9).bind_value("high", 9);
        statement.execute().await.expect("Could not execute again");
        assert_eq!(statement.row_count(), 1);
        assert_eq!(connection.client().live_requests(), 1);
        statement.close().await;
        assert_eq!(connection.client().live_requests(), 0);
        let log = connection.client().log.lock().expect("Log is poisoned");
        let last = log.iter().rev().take(2).collect::<Vec<_>>();
        assert_eq!(last[0], &vec!["param0".to_string(), "param1".to_string()]);
        assert_eq!(last[0], last[1]);
    }

    #[tokio::test]
    async fn not_connected() {
        init_logs();
        let connection = MssqlConnection::new(MockClient::new());
        connection.client().connected.store(false, Ordering::Relaxed);
        let mut statement = connection.prepare("SELECT id FROM users");
        silent_logs! {
            let result = statement.execute().await;
            assert_eq!(
                result
                    .expect_err("Should not execute")
                    .downcast_ref::<StatementError>(),
                Some(&StatementError::NotConnected { dialect: "MSSQL" })
            );
        }
        assert_eq!(connection.client().live_requests(), 0);
    }

    #[tokio::test]
    async fn output_id_column() {
        init_logs();
        let connection = MssqlConnection::new(MockClient::new()).with_id_column("ID");
        seed(&connection, &UsersFixture::MSSQL).await;
        let mut statement = connection.prepare(UsersFixture::MSSQL.insert);
        statement.bind_value("name", "Erin");
        statement.execute().await.expect("Could not insert");
        assert_eq!(statement.row_count(), 1);
        assert_eq!(statement.last_insert_id(), None);
        statement.close().await;

        let mut statement = connection.prepare("INSERT INTO users (name) VALUES (:name)");
        statement.bind_value("name", "Frank");
        statement.execute().await.expect("Could not insert");
        assert_eq!(statement.last_insert_id(), None);
        statement.close().await;
    }
}
