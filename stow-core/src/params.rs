use crate::{AsValue, Value};

/// Identifies a bound parameter: positional index (from 0) or name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ParamKey {
    fn from(value: usize) -> Self {
        ParamKey::Index(value)
    }
}

impl From<&str> for ParamKey {
    fn from(value: &str) -> Self {
        ParamKey::Name(value.trim_start_matches(':').into())
    }
}

impl From<String> for ParamKey {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

/// A named parameter value with its advisory, dialect specific, type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParam {
    pub value: Value,
    pub ty: Option<String>,
}

impl BoundParam {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ty: None,
        }
    }
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }
}

impl<T: AsValue> From<T> for BoundParam {
    fn from(value: T) -> Self {
        BoundParam::new(value)
    }
}

impl From<Value> for BoundParam {
    fn from(value: Value) -> Self {
        BoundParam::new(value)
    }
}

impl From<&str> for BoundParam {
    fn from(value: &str) -> Self {
        BoundParam::new(value)
    }
}

/// Named parameters, iterated in insertion order.
///
/// Binding a name again replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedParams(Vec<(String, BoundParam)>);

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, name: impl Into<String>, param: impl Into<BoundParam>) {
        let name = name.into();
        let name = name.trim_start_matches(':');
        let param = param.into();
        match self.0.iter_mut().find(|(k, _)| k == name) {
            Some((_, current)) => *current = param,
            None => self.0.push((name.to_owned(), param)),
        }
    }
    pub fn get(&self, name: &str) -> Option<&BoundParam> {
        self.position(name).map(|i| &self.0[i].1)
    }
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k == name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundParam)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl IntoIterator for NamedParams {
    type Item = (String, BoundParam);
    type IntoIter = std::vec::IntoIter<(String, BoundParam)>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<BoundParam>> FromIterator<(K, V)> for NamedParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = NamedParams::new();
        for (k, v) in iter {
            result.insert(k, v);
        }
        result
    }
}

/// Parameters passed directly to `Statement::execute_with`.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Replaces the positional values.
    Positional(Vec<Value>),
    /// Merged into the named parameters.
    Named(NamedParams),
}

impl From<Vec<Value>> for Params {
    fn from(value: Vec<Value>) -> Self {
        Params::Positional(value)
    }
}

impl From<NamedParams> for Params {
    fn from(value: NamedParams) -> Self {
        Params::Named(value)
    }
}

/// Builds [`Params::Positional`] from heterogeneous values.
///
/// ```rust
/// let params = stow_core::params![5, "Alice"];
/// assert!(matches!(params, stow_core::Params::Positional(v) if v.len() == 2));
/// ```
#[macro_export]
macro_rules! params {
    ($($value:expr),* $(,)?) => {
        $crate::Params::Positional(vec![$($crate::Value::from($value)),*])
    };
}

/// Builds [`Params::Named`] from `name => value` pairs, keeping their order.
#[macro_export]
macro_rules! named_params {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut named = $crate::NamedParams::new();
        $(named.insert($name, $value);)*
        $crate::Params::Named(named)
    }};
}

/// Outcome of rewriting `:name` tokens into dialect placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub sql: String,
    /// One value per positional slot: the original positional values followed by one
    /// value per named parameter, in insertion order.
    pub values: Vec<Value>,
    /// Slot referenced by each placeholder, in textual order.
    pub occurrences: Vec<usize>,
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces every `:name` token bound in `named` with `placeholder(index)`.
///
/// Each name takes the next free slot after `positional`, in insertion order of `named`,
/// so a name occurring several times in the text is bound to a single value. Tokens are
/// matched whole (`:id` does not match inside `:identifier`) and `::` casts are skipped.
/// Names that are not bound are left untouched. A `?` counts as a reference to the next
/// positional slot.
pub fn rewrite_named(
    sql: &str,
    positional: &[Value],
    named: &NamedParams,
    placeholder: impl Fn(usize) -> String,
) -> Rewritten {
    let offset = positional.len();
    let mut values = positional.to_vec();
    values.extend(named.iter().map(|(_, v)| v.value.clone()));
    let mut result = String::with_capacity(sql.len() + 16);
    let mut occurrences = Vec::new();
    let mut next_positional = 0;
    let mut previous = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '?' => {
                occurrences.push(next_positional);
                next_positional += 1;
                result.push(c);
            }
            ':' if previous != Some(':')
                && chars.peek().is_some_and(|(_, c)| is_identifier_start(*c)) =>
            {
                let start = i + 1;
                let mut end = start;
                while let Some((j, c)) = chars.peek().copied()
                    && is_identifier(c)
                {
                    end = j + c.len_utf8();
                    chars.next();
                }
                let name = &sql[start..end];
                match named.position(name) {
                    Some(position) => {
                        let index = offset + position;
                        result.push_str(&placeholder(index));
                        occurrences.push(index);
                    }
                    None => {
                        result.push(':');
                        result.push_str(name);
                    }
                }
                previous = name.chars().last();
                continue;
            }
            _ => result.push(c),
        }
        previous = Some(c);
    }
    Rewritten {
        sql: result,
        values,
        occurrences,
    }
}
