use crate::{Error, Result};
use std::fmt::{self, Display};

/// Maximum number of bytes of a query printed in logs and error messages.
pub const PRINTABLE_QUERY_LEN: usize = 497;

/// Display adapter printing at most [`PRINTABLE_QUERY_LEN`] bytes of the text.
pub struct Truncated<'a>(pub &'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0;
        if text.len() <= PRINTABLE_QUERY_LEN {
            return f.write_str(text.trim_end());
        }
        let mut end = PRINTABLE_QUERY_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        write!(f, "{}...", text[..end].trim_end())
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::Truncated(::std::convert::AsRef::<str>::as_ref($query))
    };
}

/// Sends the value through the channel and logs in case of error.
#[macro_export]
macro_rules! send_value {
    ($tx:ident, $value:expr) => {{
        if let Err(e) = $tx.send($value) {
            log::error!("{:#}", e);
        }
    }};
}

/// Returns the part of `url` following `<scheme>://`, or an error mentioning the dialect.
pub fn strip_url_scheme<'u>(url: &'u str, scheme: &str, dialect: &str) -> Result<&'u str> {
    let prefix = format!("{}://", scheme);
    url.strip_prefix(&prefix).ok_or_else(|| {
        let error = Error::msg(format!(
            "{} connection url must start with `{}`",
            dialect, prefix
        ));
        log::error!("{:#}", error);
        error
    })
}

/// Whether `sql` contains `keyword` as a standalone word, ignoring the case.
pub fn contains_keyword(sql: &str, keyword: &str) -> bool {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word.eq_ignore_ascii_case(keyword))
}
