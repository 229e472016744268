use std::{
    iter::Peekable,
    str::Chars,
    sync::{Arc, Mutex},
};
use stow::{AsValue, Error, Result, RowLabeled, RowNames, Value};

/// What [`FakeDatabase::run`] reports, mock native clients reshape it for their dialect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeOutcome {
    /// Whether the statement produced a result set (reads, `RETURNING`, `OUTPUT`).
    pub has_rows: bool,
    pub rows: Vec<RowLabeled>,
    pub affected_rows: u64,
    pub insert_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Symbol(String),
    Param(usize),
}

fn take_while(
    chars: &mut Peekable<Chars<'_>>,
    first: Option<char>,
    f: impl Fn(char) -> bool,
) -> String {
    let mut result: String = first.into_iter().collect();
    while let Some(c) = chars.peek().copied()
        && f(c)
    {
        result.push(c);
        chars.next();
    }
    result
}

/// Splits the statement, resolving `?`, `$n` and `@paramN` placeholders into slots.
fn tokenize(sql: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut sequential = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '?' => {
                tokens.push(Token::Param(sequential));
                sequential += 1;
            }
            '$' => {
                let digits = take_while(&mut chars, None, |c| c.is_ascii_digit());
                let number: usize = digits.parse().unwrap_or_default();
                tokens.push(Token::Param(number.saturating_sub(1)));
            }
            '@' => {
                let name = take_while(&mut chars, None, |c| c.is_ascii_alphanumeric());
                let number = name.trim_start_matches("param").parse().unwrap_or_default();
                tokens.push(Token::Param(number));
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let word = take_while(&mut chars, Some(c), |c| {
                    c.is_ascii_alphanumeric() || c == '_' || c == '.'
                });
                tokens.push(Token::Word(word.to_ascii_uppercase()));
            }
            '<' | '>' | '!' => {
                let symbol = take_while(&mut chars, Some(c), |c| c == '=');
                tokens.push(Token::Symbol(symbol));
            }
            c => tokens.push(Token::Symbol(c.to_string())),
        }
    }
    tokens
}

#[derive(Debug, Default)]
struct State {
    users: Vec<(i64, String)>,
    next_id: i64,
}

/// In-memory stand-in for a database holding the `users` table.
///
/// Understands exactly the statements the shared scenarios issue, in any placeholder
/// style. Anything else fails like an unknown table would.
#[derive(Debug, Default)]
pub struct FakeDatabase {
    state: Mutex<State>,
}

impl FakeDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fails when the statement would not be accepted by [`FakeDatabase::run`].
    pub fn check(&self, sql: &str) -> Result<()> {
        let tokens = tokenize(sql);
        let known = tokens.windows(2).any(|v| match v {
            [Token::Word(before), Token::Word(table)] => {
                table == "USERS"
                    && ["FROM", "INTO", "UPDATE", "TABLE", "EXISTS"].contains(&before.as_str())
            }
            _ => false,
        });
        if !known {
            return Err(Error::msg(format!("no such table in `{}`", sql)));
        }
        Ok(())
    }

    pub fn run(&self, sql: &str, params: &[Value]) -> Result<FakeOutcome> {
        self.check(sql)?;
        let tokens = tokenize(sql);
        let param = |slot: usize| -> Result<Value> {
            params
                .get(slot)
                .cloned()
                .ok_or_else(|| Error::msg(format!("Parameter {} is missing", slot)))
        };
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::msg("Fake database state is poisoned"))?;
        let Some(Token::Word(command)) = tokens.first() else {
            return Err(Error::msg("Empty statement"));
        };
        match command.as_str() {
            "DROP" => {
                *state = State::default();
                Ok(FakeOutcome::default())
            }
            "CREATE" => Ok(FakeOutcome::default()),
            "INSERT" => {
                let columns: Vec<&str> = tokens
                    .iter()
                    .skip_while(|v| **v != Token::Symbol("(".into()))
                    .take_while(|v| **v != Token::Symbol(")".into()))
                    .filter_map(|v| match v {
                        Token::Word(w) => Some(w.as_str()),
                        _ => None,
                    })
                    .collect();
                let slots: Vec<usize> = tokens
                    .iter()
                    .filter_map(|v| match v {
                        Token::Param(i) => Some(*i),
                        _ => None,
                    })
                    .collect();
                let mut id = None;
                let mut name = None;
                for (column, slot) in columns.iter().zip(slots) {
                    match *column {
                        "ID" => id = Some(i64::try_from_value(param(slot)?)?),
                        "NAME" => name = Some(String::try_from_value(param(slot)?)?),
                        _ => return Err(Error::msg(format!("Unknown column `{}`", column))),
                    }
                }
                let name = name.ok_or_else(|| Error::msg("Column `name` cannot be null"))?;
                let id = id.unwrap_or(state.next_id.max(1));
                if state.users.iter().any(|(v, _)| *v == id) {
                    return Err(Error::msg(format!("Duplicate primary key {}", id)));
                }
                state.next_id = state.next_id.max(id + 1);
                state.users.push((id, name));
                state.users.sort_by_key(|(v, _)| *v);
                let returning = tokens.iter().any(|v| {
                    matches!(v, Token::Word(w) if w == "RETURNING" || w == "OUTPUT")
                });
                Ok(FakeOutcome {
                    has_rows: returning,
                    rows: if returning {
                        vec![RowLabeled::new(
                            ["id".to_string()].into(),
                            [Value::Int64(id)].into(),
                        )]
                    } else {
                        Vec::new()
                    },
                    affected_rows: 1,
                    insert_id: Some(id),
                })
            }
            "SELECT" => {
                let labels: Vec<String> = tokens
                    .iter()
                    .skip(1)
                    .take_while(|v| **v != Token::Word("FROM".into()))
                    .filter_map(|v| match v {
                        Token::Word(w) => Some(w.to_ascii_lowercase()),
                        Token::Symbol(s) if s == "*" => Some("*".into()),
                        _ => None,
                    })
                    .flat_map(|v| match v.as_str() {
                        "*" => vec!["id".to_string(), "name".to_string()],
                        _ => vec![v],
                    })
                    .collect();
                let filter = Filter::parse(&tokens, &param)?;
                let labels: RowNames = labels.into();
                let mut rows = Vec::new();
                for (id, name) in state.users.iter().filter(|v| filter.accepts(v)) {
                    let values = labels
                        .iter()
                        .map(|label| match label.as_str() {
                            "id" => Ok(Value::Int64(*id)),
                            "name" => Ok(Value::Varchar(name.clone())),
                            _ => Err(Error::msg(format!("Unknown column `{}`", label))),
                        })
                        .collect::<Result<_>>()?;
                    rows.push(RowLabeled::new(labels.clone(), values));
                }
                Ok(FakeOutcome {
                    has_rows: true,
                    rows,
                    ..Default::default()
                })
            }
            "UPDATE" => {
                let slot = tokens
                    .iter()
                    .skip_while(|v| **v != Token::Word("SET".into()))
                    .find_map(|v| match v {
                        Token::Param(i) => Some(*i),
                        _ => None,
                    })
                    .ok_or_else(|| Error::msg("Missing the new name"))?;
                let name = String::try_from_value(param(slot)?)?;
                let filter = Filter::parse(&tokens, &param)?;
                let mut affected_rows = 0;
                for user in state.users.iter_mut().filter(|v| filter.accepts(v)) {
                    user.1 = name.clone();
                    affected_rows += 1;
                }
                Ok(FakeOutcome {
                    affected_rows,
                    ..Default::default()
                })
            }
            "DELETE" => {
                let filter = Filter::parse(&tokens, &param)?;
                let before = state.users.len();
                state.users.retain(|v| !filter.accepts(v));
                Ok(FakeOutcome {
                    affected_rows: (before - state.users.len()) as u64,
                    ..Default::default()
                })
            }
            _ => Err(Error::msg(format!("Unsupported statement `{}`", sql))),
        }
    }
}

/// Conjunction of `column <op> parameter` conditions following `WHERE`.
struct Filter(Vec<(String, String, Value)>);

impl Filter {
    fn parse(tokens: &[Token], param: &impl Fn(usize) -> Result<Value>) -> Result<Self> {
        let mut conditions = Vec::new();
        let mut rest = tokens
            .iter()
            .skip_while(|v| **v != Token::Word("WHERE".into()))
            .skip(1)
            .take_while(|v| **v != Token::Word("ORDER".into()));
        loop {
            match (rest.next(), rest.next(), rest.next()) {
                (Some(Token::Word(column)), Some(Token::Symbol(op)), Some(Token::Param(slot))) => {
                    conditions.push((column.clone(), op.clone(), param(*slot)?));
                }
                (None, ..) => break,
                _ => return Err(Error::msg("Unsupported condition")),
            }
            match rest.next() {
                Some(Token::Word(w)) if w == "AND" => continue,
                None => break,
                _ => return Err(Error::msg("Unsupported condition")),
            }
        }
        Ok(Self(conditions))
    }

    fn accepts(&self, (id, name): &(i64, String)) -> bool {
        self.0.iter().all(|(column, op, value)| {
            let ordering = match column.as_str() {
                "ID" => i64::try_from_value(value.clone()).map(|v| id.cmp(&v)),
                "NAME" => String::try_from_value(value.clone()).map(|v| name.cmp(&v)),
                _ => return false,
            };
            let Ok(ordering) = ordering else {
                return false;
            };
            match op.as_str() {
                "=" => ordering.is_eq(),
                ">" => ordering.is_gt(),
                ">=" => ordering.is_ge(),
                "<" => ordering.is_lt(),
                "<=" => ordering.is_le(),
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_placeholders() {
        assert_eq!(
            tokenize("a = ? AND b = $2 OR c >= @param4"),
            vec![
                Token::Word("A".into()),
                Token::Symbol("=".into()),
                Token::Param(0),
                Token::Word("AND".into()),
                Token::Word("B".into()),
                Token::Symbol("=".into()),
                Token::Param(1),
                Token::Word("OR".into()),
                Token::Word("C".into()),
                Token::Symbol(">=".into()),
                Token::Param(4),
            ]
        );
    }

    #[test]
    fn fake_users() {
        let database = FakeDatabase::new();
        database
            .run(
                "INSERT INTO users (id, name) VALUES ($1, $2)",
                &[5.into(), "Alice".into()],
            )
            .unwrap();
        let outcome = database
            .run(
                "INSERT INTO users (name) VALUES (?) RETURNING id",
                &["Bob".into()],
            )
            .unwrap();
        assert_eq!(outcome.insert_id, Some(6));
        assert_eq!(outcome.rows.len(), 1);
        let outcome = database
            .run("SELECT name FROM users WHERE id >= @param0", &[6.into()])
            .unwrap();
        assert_eq!(outcome.rows[0].values(), [Value::Varchar("Bob".into())]);
        assert!(database.run("SELECT * FROM missing", &[]).is_err());
    }
}
