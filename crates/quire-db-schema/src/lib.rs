//! Table model types for quire.
//!
//! This crate contains the pieces shared between the schema synthesizer and
//! anything that consumes its output:
//! - [`TableBuilder`], the narrow interface the synthesizer talks to
//! - [`Table`], an in-memory builder that records what it is asked to build
//! - [`Platform`] and [`PlatformKind`], which identify the SQL dialect in play

use indexmap::IndexMap;
use quire_sql::{QuoteStyle, index_name};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Portable column types.
///
/// These are abstract types; each platform maps them to its own DDL
/// (`string` becomes `VARCHAR(n)`, `datetime` becomes `TIMESTAMP(0)` on
/// PostgreSQL, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// Whole numbers
    Integer,
    /// Variable-length string with a maximum length
    String,
    /// Unbounded text
    Text,
    /// true / false
    Boolean,
    /// Calendar date
    Date,
    /// Date and time of day
    DateTime,
    /// Floating point
    Float,
    /// Fixed-point decimal with precision and scale
    Decimal,
}

impl SqlType {
    /// The portable type name, as used in content-type configuration and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::String => "string",
            SqlType::Text => "text",
            SqlType::Boolean => "boolean",
            SqlType::Date => "date",
            SqlType::DateTime => "datetime",
            SqlType::Float => "float",
            SqlType::Decimal => "decimal",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnDefault {
    /// An explicit `DEFAULT NULL`
    Null,
    /// A numeric literal (also used for boolean `0`)
    Integer(i64),
    /// A string literal
    String(String),
}

impl ColumnDefault {
    /// The empty-string default.
    pub fn empty_string() -> Self {
        ColumnDefault::String(String::new())
    }
}

impl fmt::Display for ColumnDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDefault::Null => f.write_str("NULL"),
            ColumnDefault::Integer(n) => write!(f, "{}", n),
            ColumnDefault::String(s) => write!(f, "{}", quire_sql::Lit(s)),
        }
    }
}

/// Options accompanying a column declaration.
///
/// The default is a `NOT NULL` column with no size, no default and no
/// autoincrement. Use the chained setters to adjust it:
///
/// ```
/// use quire_db_schema::{ColumnDefault, ColumnOptions};
///
/// let opts = ColumnOptions::new().length(32).nullable().default_value(ColumnDefault::empty_string());
/// assert_eq!(opts.length, Some(32));
/// assert!(!opts.notnull);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnOptions {
    /// Maximum length (string columns)
    pub length: Option<u32>,
    /// Total digits (decimal columns)
    pub precision: Option<u32>,
    /// Digits after the decimal point (decimal columns)
    pub scale: Option<u32>,
    /// Whether the column rejects NULL
    pub notnull: bool,
    /// Default value, `None` when the column declares no default
    pub default: Option<ColumnDefault>,
    /// Whether the column is filled by the database (identity / serial)
    pub autoincrement: bool,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            length: None,
            precision: None,
            scale: None,
            notnull: true,
            default: None,
            autoincrement: false,
        }
    }
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.notnull = false;
        self
    }

    pub fn default_value(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the default when one is given, leaves it unset otherwise.
    pub fn default_value_opt(mut self, default: Option<ColumnDefault>) -> Self {
        self.default = default;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }
}

/// A declared column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Portable type
    pub sql_type: SqlType,
    /// Size, nullability, default
    pub options: ColumnOptions,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType, options: ColumnOptions) -> Self {
        Self {
            name: name.into(),
            sql_type,
            options,
        }
    }

    /// Whether the column allows NULL.
    pub fn nullable(&self) -> bool {
        !self.options.notnull
    }
}

/// A (non-unique) index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Index {
    /// Index name
    pub name: String,
    /// Indexed columns, in order
    pub columns: Vec<String>,
}

/// Errors raised by a [`TableBuilder`] when asked for something inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("table `{table}` already has a column named `{column}`")]
    DuplicateColumn { table: String, column: String },

    #[error("table `{table}` has no column named `{column}`")]
    UnknownColumn { table: String, column: String },

    #[error("table `{table}` already has an index `{index}`")]
    DuplicateIndex { table: String, index: String },

    #[error("table `{table}` already has a primary key")]
    PrimaryKeyAlreadySet { table: String },

    #[error("table `{table}`: an index or key needs at least one column")]
    EmptyColumnList { table: String },
}

/// The table-building interface the schema synthesizer drives.
///
/// Implementations decide what "building" means: [`Table`] records the
/// declarations in memory, other implementations may forward them to a
/// migration tool. Implementations are expected to reject a second column
/// with the same name.
pub trait TableBuilder {
    /// Declare a column.
    fn add_column(
        &mut self,
        name: &str,
        sql_type: SqlType,
        options: ColumnOptions,
    ) -> Result<(), TableError>;

    /// Declare a non-unique index over the given columns.
    fn add_index(&mut self, columns: &[&str]) -> Result<(), TableError>;

    /// Declare the primary key.
    fn set_primary_key(&mut self, columns: &[&str]) -> Result<(), TableError>;
}

/// An in-memory table definition, built through [`TableBuilder`].
///
/// Column and index order is preserved. Index names follow
/// [`quire_sql::index_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Columns, in declaration order
    pub columns: IndexMap<String, Column>,
    /// Indices, in declaration order
    pub indices: Vec<Index>,
    /// Primary key columns (empty until set)
    pub primary_key: Vec<String>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            indices: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Whether `column` is (part of) the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key.iter().any(|c| c == column)
    }

    fn check_columns(&self, columns: &[&str]) -> Result<(), TableError> {
        if columns.is_empty() {
            return Err(TableError::EmptyColumnList {
                table: self.name.clone(),
            });
        }
        for col in columns {
            if !self.columns.contains_key(*col) {
                return Err(TableError::UnknownColumn {
                    table: self.name.clone(),
                    column: col.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl TableBuilder for Table {
    fn add_column(
        &mut self,
        name: &str,
        sql_type: SqlType,
        options: ColumnOptions,
    ) -> Result<(), TableError> {
        if self.columns.contains_key(name) {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        debug!(table = %self.name, column = %name, %sql_type, "add column");
        self.columns
            .insert(name.to_string(), Column::new(name, sql_type, options));
        Ok(())
    }

    fn add_index(&mut self, columns: &[&str]) -> Result<(), TableError> {
        self.check_columns(columns)?;
        let name = index_name(&self.name, columns);
        if self.indices.iter().any(|idx| idx.name == name) {
            return Err(TableError::DuplicateIndex {
                table: self.name.clone(),
                index: name,
            });
        }
        debug!(table = %self.name, index = %name, "add index");
        self.indices.push(Index {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        Ok(())
    }

    fn set_primary_key(&mut self, columns: &[&str]) -> Result<(), TableError> {
        if !self.primary_key.is_empty() {
            return Err(TableError::PrimaryKeyAlreadySet {
                table: self.name.clone(),
            });
        }
        self.check_columns(columns)?;
        debug!(table = %self.name, columns = ?columns, "set primary key");
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        Ok(())
    }
}

// =============================================================================
// Platforms
// =============================================================================

/// The SQL dialects quire knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlatformKind {
    /// SQLite (file-based, embedded)
    #[default]
    Sqlite,
    /// PostgreSQL
    PostgreSql,
    /// MySQL and MariaDB
    MySql,
    /// Microsoft SQL Server
    SqlServer,
    /// Oracle
    Oracle,
}

impl PlatformKind {
    /// Every known platform, in a stable order.
    pub const ALL: [PlatformKind; 5] = [
        PlatformKind::Sqlite,
        PlatformKind::PostgreSql,
        PlatformKind::MySql,
        PlatformKind::SqlServer,
        PlatformKind::Oracle,
    ];

    /// Canonical name, accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Sqlite => "sqlite",
            PlatformKind::PostgreSql => "postgresql",
            PlatformKind::MySql => "mysql",
            PlatformKind::SqlServer => "sqlserver",
            PlatformKind::Oracle => "oracle",
        }
    }

    /// Whether TEXT columns must default to `''` rather than NULL.
    ///
    /// SQLite and PostgreSQL mishandle a NULL default on TEXT columns that
    /// other content relies on being a string. This is the only place that
    /// decides it.
    pub fn requires_empty_text_default(&self) -> bool {
        matches!(self, PlatformKind::Sqlite | PlatformKind::PostgreSql)
    }

    /// How identifiers are quoted.
    pub fn quote_style(&self) -> QuoteStyle {
        match self {
            PlatformKind::MySql => QuoteStyle::Backtick,
            PlatformKind::SqlServer => QuoteStyle::Bracket,
            PlatformKind::Sqlite | PlatformKind::PostgreSql | PlatformKind::Oracle => {
                QuoteStyle::Double
            }
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a platform name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform `{0}` (expected one of: sqlite, postgresql, mysql, sqlserver, oracle)")]
pub struct UnknownPlatform(pub String);

impl FromStr for PlatformKind {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" | "pdo_sqlite" => Ok(PlatformKind::Sqlite),
            "postgresql" | "postgres" | "pgsql" | "pdo_pgsql" => Ok(PlatformKind::PostgreSql),
            "mysql" | "mariadb" | "pdo_mysql" => Ok(PlatformKind::MySql),
            "sqlserver" | "mssql" | "sqlsrv" => Ok(PlatformKind::SqlServer),
            "oracle" | "oci8" => Ok(PlatformKind::Oracle),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// The active SQL dialect, as seen by the schema synthesizer.
///
/// Dialect-specific behavior is asked through capability methods rather than
/// by comparing kinds, so a new dialect only has to answer the questions.
pub trait Platform {
    /// Which dialect this is.
    fn kind(&self) -> PlatformKind;

    /// Whether TEXT columns must default to `''` rather than NULL.
    fn requires_empty_text_default(&self) -> bool {
        self.kind().requires_empty_text_default()
    }
}

impl Platform for PlatformKind {
    fn kind(&self) -> PlatformKind {
        *self
    }
}
