use quire_db_schema::{TableError, UnknownPlatform};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("field `{field}` has unknown type `{field_type}`")]
    UnknownFieldType { field: String, field_type: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no .config/quire.styx found in current directory or any parent")]
    NotFound,

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    UnknownPlatform(#[from] UnknownPlatform),

    #[error("content type `{0}` is not configured")]
    UnknownContentType(String),
}
