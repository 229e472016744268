#[cfg(test)]
mod tests {
    use indoc::indoc;
    use std::sync::Arc;
    use stow_core::{
        Driver, Error, ExecuteResult, FetchMode, FetchedRow, MutationSummary, Prepared,
        QueryKind, QueryResult, Result, RowLabeled, Statement, StatementError, Value,
        named_params, params,
    };

    #[derive(Clone, Default)]
    struct MockDriver<const NUMBERED: bool>;

    impl<const NUMBERED: bool> Driver for MockDriver<NUMBERED> {
        type Prepared = MockPrepared;

        const NAME: &'static str = "mock";
        const DISPLAY_NAME: &'static str = "Mock";
        const NUMBERED_PLACEHOLDERS: bool = NUMBERED;

        fn placeholder(&self, index: usize) -> String {
            if NUMBERED {
                format!("${}", index + 1)
            } else {
                "?".into()
            }
        }
    }

    #[derive(Default)]
    struct MockPrepared {
        rows: Vec<RowLabeled>,
        prepared: Vec<String>,
        executed: Vec<(QueryKind, String, Vec<Value>)>,
        closed: usize,
        fail_close: bool,
    }

    impl Prepared for MockPrepared {
        async fn prepare(&mut self, sql: &str) -> Result<()> {
            self.prepared.push(sql.into());
            Ok(())
        }
        async fn execute(
            &mut self,
            kind: QueryKind,
            sql: &str,
            params: Vec<Value>,
        ) -> Result<QueryResult> {
            self.executed.push((kind, sql.into(), params));
            Ok(match kind {
                QueryKind::Read => self.rows.clone().into(),
                QueryKind::Write => MutationSummary::new(2, Some(Value::Int64(42))).into(),
            })
        }
        async fn close(&mut self) -> Result<()> {
            self.closed += 1;
            if self.fail_close {
                return Err(Error::msg("handle was already released"));
            }
            Ok(())
        }
    }

    fn users() -> Vec<RowLabeled> {
        let labels: Arc<[String]> = ["id".to_string(), "name".to_string()].into();
        [(1, "A"), (2, "B"), (3, "C")]
            .into_iter()
            .map(|(id, name)| {
                RowLabeled::new(
                    labels.clone(),
                    [Value::Int64(id), Value::Varchar(name.into())].into(),
                )
            })
            .collect()
    }

    fn statement<const N: bool>(sql: &str) -> Statement<MockDriver<N>> {
        Statement::new(
            MockDriver,
            MockPrepared {
                rows: users(),
                ..Default::default()
            },
            sql,
        )
    }

    #[tokio::test]
    async fn prepare_is_idempotent() {
        let mut statement = statement::<true>("SELECT * FROM users WHERE id = :id");
        statement.bind_value(":id", 5);
        statement.prepare().await.expect("Could not prepare");
        statement.prepare().await.expect("Could not prepare again");
        statement.execute().await.expect("Could not execute");
        assert!(statement.is_prepared());
        assert_eq!(
            statement.inner().prepared,
            vec!["SELECT * FROM users WHERE id = $1".to_string()]
        );
        assert_eq!(statement.positional_params(), [Value::Int64(5)]);
    }

    #[tokio::test]
    async fn duplicate_named_numbered() {
        let mut statement = statement::<true>("SELECT * FROM t WHERE a = :x AND b = :x");
        statement.bind_params([("x", 7)]);
        statement.execute().await.expect("Could not execute");
        assert_eq!(statement.sql(), "SELECT * FROM t WHERE a = $1 AND b = $1");
        assert_eq!(statement.positional_params(), [Value::Int64(7)]);
        let (kind, _, params) = &statement.inner().executed[0];
        assert_eq!(*kind, QueryKind::Read);
        assert_eq!(*params, vec![Value::Int64(7)]);
    }

    #[tokio::test]
    async fn duplicate_named_glyph() {
        let mut statement = statement::<false>("SELECT * FROM t WHERE a = :x AND b = :x");
        statement.bind_params([("x", 7)]);
        statement.execute().await.expect("Could not execute");
        assert_eq!(statement.sql(), "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(statement.positional_params(), [Value::Int64(7)]);
        let (_, _, params) = &statement.inner().executed[0];
        assert_eq!(*params, vec![Value::Int64(7), Value::Int64(7)]);
    }

    #[tokio::test]
    async fn rewrite_follows_binding_order() {
        let mut statement = statement::<true>(indoc! {"
            UPDATE users
            SET name = :name
            WHERE id = :id
        "});
        statement.bind_value("id", 3).bind_value("name", "Carl");
        statement.execute().await.expect("Could not execute");
        assert_eq!(
            statement.sql(),
            indoc! {"
                UPDATE users
                SET name = $2
                WHERE id = $1
            "}
        );
        assert_eq!(
            statement.positional_params(),
            [Value::Int64(3), Value::Varchar("Carl".into())]
        );
    }

    #[tokio::test]
    async fn rebinding_named_after_prepare() {
        let mut statement = statement::<false>("SELECT * FROM users WHERE id = :id OR id = ?");
        statement.bind_value(0usize, 1).bind_value("id", 2);
        statement.execute().await.expect("Could not execute");
        statement
            .execute_with(named_params! {"id" => 9})
            .await
            .expect("Could not execute again");
        let executed = &statement.inner().executed;
        assert_eq!(executed[0].2, vec![Value::Int64(2), Value::Int64(1)]);
        assert_eq!(executed[1].2, vec![Value::Int64(9), Value::Int64(1)]);
        assert_eq!(statement.inner().prepared.len(), 1);

        let result = statement.execute_with(named_params! {"other" => 1}).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn positional_bound_after_prepare() {
        let mut statement = statement::<false>("SELECT * FROM users WHERE name = :name AND id = ?");
        statement.bind_value("name", "Alice");
        statement.prepare().await.expect("Could not prepare");
        assert_eq!(statement.sql(), "SELECT * FROM users WHERE name = ? AND id = ?");
        statement
            .execute_with(params![5])
            .await
            .expect("Could not execute");
        statement.bind_value(0usize, 6);
        statement.execute().await.expect("Could not execute again");
        let executed = &statement.inner().executed;
        assert_eq!(
            executed[0].2,
            vec![Value::Varchar("Alice".into()), Value::Int64(5)]
        );
        assert_eq!(
            executed[1].2,
            vec![Value::Varchar("Alice".into()), Value::Int64(6)]
        );
    }

    #[tokio::test]
    async fn execute_with_positional() {
        let mut statement = statement::<true>("SELECT * FROM users WHERE id = $1");
        let result = statement
            .execute_with(params![5])
            .await
            .expect("Could not execute");
        assert_eq!(result.rows().map(|v| v.len()), Some(3));
        assert_eq!(statement.inner().executed[0].2, vec![Value::Int64(5)]);
    }

    #[tokio::test]
    async fn cursor_exhaustion() {
        let mut statement = statement::<true>("SELECT id, name FROM users");
        statement.execute().await.expect("Could not execute");
        let first = statement.fetch().expect("There should be a first row");
        assert_eq!(
            first.as_record().and_then(|v| v.get_column("name")),
            Some(&Value::Varchar("A".into()))
        );
        assert_eq!(statement.fetch_all().len(), 2);
        assert_eq!(statement.fetch(), None);
        assert_eq!(statement.fetch(), None);
        assert!(statement.fetch_all().is_empty());
        assert_eq!(statement.fetch_row(), None);
    }

    #[tokio::test]
    async fn fetch_column_advances() {
        let mut statement = statement::<true>("SELECT id, name FROM users");
        statement.set_fetch_mode(FetchMode::Scalar);
        statement.execute().await.expect("Could not execute");
        assert!(statement.fetch_column(2).is_err());
        let names = [
            statement.fetch_column(1).expect("Column 1 exists"),
            statement.fetch_column(1).expect("Column 1 exists"),
            statement.fetch_column(1).expect("Column 1 exists"),
        ];
        assert_eq!(
            names,
            [
                Some(Value::Varchar("A".into())),
                Some(Value::Varchar("B".into())),
                Some(Value::Varchar("C".into())),
            ]
        );
        assert_eq!(statement.fetch_column(1).expect("Should not fail"), None);
    }

    #[tokio::test]
    async fn fetch_modes() {
        let mut statement = statement::<true>("SELECT id, name FROM users");
        statement.set_fetch_mode(FetchMode::Tuple);
        let result = statement.execute().await.expect("Could not execute");
        assert_eq!(
            result.rows().and_then(|v| v.first()),
            Some(&FetchedRow::Tuple(
                [Value::Int64(1), Value::Varchar("A".into())].into()
            ))
        );
        statement.set_fetch_mode(FetchMode::Scalar);
        assert_eq!(statement.fetch(), Some(FetchedRow::Scalar(Value::Int64(1))));
        statement.set_fetch_mode(FetchMode::Record);
        let row = statement.fetch_row().expect("There should be a row");
        assert_eq!(row.get(1), Some(&Value::Varchar("B".into())));
        assert_eq!(statement.fetch(), None);
    }

    #[tokio::test]
    async fn mutation_summary() {
        let mut statement = statement::<true>("  DELETE FROM users WHERE id > $1");
        let result = statement
            .execute_with(params![1])
            .await
            .expect("Could not execute");
        assert!(matches!(result, ExecuteResult::Mutation(..)));
        assert_eq!(statement.row_count(), 2);
        assert_eq!(statement.last_insert_id(), Some(&Value::Int64(42)));
        assert_eq!(statement.fetch(), None);
        assert_eq!(statement.inner().executed[0].0, QueryKind::Write);
    }

    #[tokio::test]
    async fn close_resets_state() {
        let mut statement = statement::<true>("SELECT id, name FROM users");
        statement.execute().await.expect("Could not execute");
        assert_eq!(statement.row_count(), 3);
        statement.inner_mut().fail_close = true;
        statement.close().await;
        assert!(!statement.is_prepared());
        assert_eq!(statement.inner().closed, 1);
        assert_eq!(statement.row_count(), 0);
        assert!(statement.fetch_all().is_empty());
        assert_eq!(statement.last_insert_id(), None);
    }

    #[derive(Default)]
    struct Bare;
    impl Prepared for Bare {}

    #[derive(Clone, Default)]
    struct BareDriver;
    impl Driver for BareDriver {
        type Prepared = Bare;
        const NAME: &'static str = "bare";
        const DISPLAY_NAME: &'static str = "Bare";
        const NUMBERED_PLACEHOLDERS: bool = false;
        fn placeholder(&self, _index: usize) -> String {
            "?".into()
        }
    }

    #[tokio::test]
    async fn hooks_not_implemented() {
        let mut statement = Statement::new(BareDriver, Bare, "SELECT 1");
        let error = statement.execute().await.expect_err("Should not execute");
        assert_eq!(
            error.downcast_ref::<StatementError>(),
            Some(&StatementError::NotImplemented { hook: "prepare" })
        );
        let error = Bare
            .execute(QueryKind::Read, "SELECT 1", vec![])
            .await
            .expect_err("Should not execute");
        assert_eq!(
            error.to_string(),
            "Statement hook `execute` is not implemented"
        );
        statement.close().await;
        assert!(!statement.is_prepared());
    }
}
