//! Derive portable SQL table schemas from CMS content-type definitions.
//!
//! A content type is a named list of typed fields ("a `text` field called
//! `title`, a `markdown` field called `body`"). Each content type is stored
//! in its own table: a fixed set of system columns shared by every content
//! type, plus one column per field, shaped by the field's type.
//!
//! ```
//! use quire::{ContentType, Field, SchemaSynthesizer};
//! use quire_db_schema::PlatformKind;
//!
//! let pages = ContentType::new("pages")
//!     .field(Field::new("title", "text"))
//!     .field(Field::new("body", "markdown"));
//!
//! let synth = SchemaSynthesizer::new(&PlatformKind::Sqlite);
//! let table = synth.synthesize(&pages, "bolt_").unwrap();
//!
//! assert_eq!(table.name, "bolt_pages");
//! assert!(table.column("title").is_some());
//! assert_eq!(table.primary_key, vec!["id"]);
//! ```
//!
//! The synthesizer only talks to a [`TableBuilder`]; [`Table`] is the
//! in-memory implementation, and [`schema`] renders one to DDL.

pub mod config;
mod content_type;
mod error;
pub mod registry;
pub mod schema;
mod synth;

pub use config::Config;
pub use content_type::{ContentType, Field};
pub use error::{ConfigError, Error};
pub use registry::{ColumnRecipe, FieldType, TypeRegistry, UnknownFieldTypeName};
pub use synth::{INDEXED_COLUMNS, PRIMARY_KEY, SLUG_COLUMN, SchemaSynthesizer, fixed_columns};

pub use quire_db_schema::{
    Column, ColumnDefault, ColumnOptions, Index, Platform, PlatformKind, SqlType, Table,
    TableBuilder, TableError,
};

/// Result type for quire operations.
pub type Result<T> = std::result::Result<T, Error>;
