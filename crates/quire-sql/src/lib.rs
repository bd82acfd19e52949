//! SQL quoting and naming helpers.
//!
//! Everything here is dialect-aware only as far as identifier quoting goes;
//! type mapping and DDL rendering live in `quire`.

use std::fmt;

/// How a dialect quotes identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// `"name"` (SQLite, PostgreSQL, Oracle)
    #[default]
    Double,
    /// `` `name` `` (MySQL / MariaDB)
    Backtick,
    /// `[name]` (SQL Server)
    Bracket,
}

impl QuoteStyle {
    fn delimiters(self) -> (char, char) {
        match self {
            QuoteStyle::Double => ('"', '"'),
            QuoteStyle::Backtick => ('`', '`'),
            QuoteStyle::Bracket => ('[', ']'),
        }
    }
}

/// A SQL string literal wrapper.
///
/// Display writes the value escaped and quoted with single quotes.
///
/// # Example
/// ```
/// use quire_sql::Lit;
/// assert_eq!(format!("{}", Lit("foo")), "'foo'");
/// assert_eq!(format!("{}", Lit("it's")), "'it''s'");
/// assert_eq!(format!("{}", Lit("")), "''");
/// ```
pub struct Lit<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> fmt::Display for Lit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'")?;
        for c in self.0.as_ref().chars() {
            if c == '\'' {
                write!(f, "''")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "'")
    }
}

/// A SQL identifier wrapper.
///
/// Display writes the value escaped and quoted with the given style. The
/// closing delimiter is doubled when it appears inside the name.
///
/// # Example
/// ```
/// use quire_sql::{Ident, QuoteStyle};
/// assert_eq!(format!("{}", Ident("user", QuoteStyle::Double)), "\"user\"");
/// assert_eq!(format!("{}", Ident("bla\"h", QuoteStyle::Double)), "\"bla\"\"h\"");
/// assert_eq!(format!("{}", Ident("order", QuoteStyle::Backtick)), "`order`");
/// assert_eq!(format!("{}", Ident("a]b", QuoteStyle::Bracket)), "[a]]b]");
/// ```
pub struct Ident<T: AsRef<str>>(pub T, pub QuoteStyle);

impl<T: AsRef<str>> fmt::Display for Ident<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.1.delimiters();
        write!(f, "{}", open)?;
        for c in self.0.as_ref().chars() {
            if c == close {
                write!(f, "{}{}", close, close)?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "{}", close)
    }
}

/// Escape a string literal for SQL.
pub fn escape_string(s: &str) -> String {
    format!("{}", Lit(s))
}

/// Quote an identifier.
///
/// Always quotes, so reserved words like `status`, `user` or `order` are safe
/// to use as column names on every dialect.
pub fn quote_ident(name: &str, style: QuoteStyle) -> String {
    format!("{}", Ident(name, style))
}

/// Longest identifier we generate. PostgreSQL truncates at 63 bytes.
pub const IDENT_MAX: usize = 63;

/// Generate a standard index name for a table and columns.
///
/// Uses the convention `idx_{table}_{columns}` where columns are joined by
/// underscore. Names that would exceed [`IDENT_MAX`] keep a truncated prefix
/// and get a stable hash suffix, so two long names never collide.
///
/// # Examples
///
/// ```
/// assert_eq!(quire_sql::index_name("bolt_pages", &["slug"]), "idx_bolt_pages_slug");
/// assert_eq!(
///     quire_sql::index_name("bolt_pages", &["datepublish", "status"]),
///     "idx_bolt_pages_datepublish_status"
/// );
/// ```
pub fn index_name(table: &str, columns: &[impl AsRef<str>]) -> String {
    let cols: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
    let full = format!("idx_{}_{}", table, cols.join("_"));
    if full.len() <= IDENT_MAX {
        return full;
    }

    let hex = blake3::hash(full.as_bytes()).to_hex().to_string();
    let suffix = &hex[..16];
    let mut len = IDENT_MAX - suffix.len() - 1;
    while len > 0 && !full.is_char_boundary(len) {
        len -= 1;
    }
    format!("{}_{}", &full[..len], suffix)
}
