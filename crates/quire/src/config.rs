//! Configuration file handling.
//!
//! Looks for `.config/quire.styx` in the current directory or any parent
//! directory:
//!
//! ```text
//! database {
//!   platform sqlite
//!   prefix bolt_
//! }
//! contenttypes {
//!   pages {
//!     fields {
//!       title { type text }
//!       slug { type slug }
//!       price { type number, index true }
//!     }
//!   }
//! }
//! ```

use crate::error::ConfigError;
use crate::{ContentType, Field};
use facet::Facet;
use indexmap::IndexMap;
use quire_db_schema::PlatformKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Table prefix used when the configuration does not set one.
pub const DEFAULT_PREFIX: &str = "bolt_";

/// Top-level configuration.
#[derive(Debug, Clone, Facet, Default)]
pub struct Config {
    /// Database settings.
    #[facet(default)]
    pub database: DatabaseConfig,

    /// Content types, keyed by name.
    #[facet(default)]
    pub contenttypes: IndexMap<String, ContentTypeConfig>,
}

/// Database settings.
#[derive(Debug, Clone, Facet, Default)]
pub struct DatabaseConfig {
    /// Target platform (`sqlite`, `postgresql`, `mysql`, `sqlserver`, `oracle`).
    /// Defaults to `sqlite`.
    #[facet(default)]
    pub platform: Option<String>,

    /// Prefix prepended to every content-type table name.
    /// Defaults to `bolt_`.
    #[facet(default)]
    pub prefix: Option<String>,
}

/// One content type.
#[derive(Debug, Clone, Facet, Default)]
pub struct ContentTypeConfig {
    /// Table name, if it differs from the content type's key.
    #[facet(default)]
    pub tablename: Option<String>,

    /// Fields, keyed by name, in declaration order.
    #[facet(default)]
    pub fields: IndexMap<String, FieldConfig>,
}

/// One content-type field.
#[derive(Debug, Clone, Facet)]
pub struct FieldConfig {
    /// Field type (`text`, `markdown`, `slug`, ...).
    #[facet(rename = "type")]
    pub field_type: String,

    /// Whether the field's column is indexed.
    #[facet(default)]
    pub index: bool,
}

impl DatabaseConfig {
    /// The configured platform.
    pub fn platform(&self) -> Result<PlatformKind, ConfigError> {
        match &self.platform {
            Some(name) => Ok(name.parse()?),
            None => Ok(PlatformKind::default()),
        }
    }

    /// The configured table prefix.
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }
}

impl Config {
    /// Parse a configuration document. `origin` is only used in errors.
    pub fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        facet_styx::from_str(source).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// The configured content types, in declaration order.
    pub fn content_types(&self) -> Vec<ContentType> {
        self.contenttypes
            .iter()
            .map(|(name, ct)| {
                let mut content_type = ContentType::new(name.clone());
                content_type.table_name = ct.tablename.clone();
                content_type.fields = ct
                    .fields
                    .iter()
                    .map(|(field_name, field)| Field {
                        name: field_name.clone(),
                        field_type: field.field_type.clone(),
                        index: field.index,
                    })
                    .collect();
                content_type
            })
            .collect()
    }
}

/// Load configuration from `.config/quire.styx`, searching up the directory tree.
pub fn load() -> Result<(Config, PathBuf), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: ".".to_string(),
        message: e.to_string(),
    })?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Path) -> Result<(Config, PathBuf), ConfigError> {
    let config_path = find_config_file(start)?;
    let config = load_file(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration from an explicit file.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Config::parse(&content, &path.display().to_string())
}

/// Find `.config/quire.styx` by searching up the directory tree.
fn find_config_file(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".config/quire.styx");
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES: &str = r#"
database {
  platform postgres
  prefix cms_
}
contenttypes {
  pages {
    fields {
      title { type text }
      slug { type slug }
      body { type markdown }
      price { type number, index true }
    }
  }
  blog-posts {
    tablename posts
    fields {
      teaser { type html }
    }
  }
}
"#;

    #[test]
    fn test_parse_config() {
        let config = Config::parse(PAGES, "<test>").unwrap();
        assert_eq!(config.database.platform().unwrap(), PlatformKind::PostgreSql);
        assert_eq!(config.database.prefix(), "cms_");

        let cts = config.content_types();
        assert_eq!(cts.len(), 2);

        let pages = &cts[0];
        assert_eq!(pages.name, "pages");
        let names: Vec<_> = pages.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "slug", "body", "price"]);
        assert_eq!(pages.fields[3].field_type, "number");
        assert!(pages.fields[3].index);
        assert!(!pages.fields[0].index);

        let posts = &cts[1];
        assert_eq!(posts.table_name("cms_"), "cms_posts");
    }

    #[test]
    fn test_database_defaults() {
        let db = DatabaseConfig::default();
        assert_eq!(db.platform().unwrap(), PlatformKind::Sqlite);
        assert_eq!(db.prefix(), DEFAULT_PREFIX);
    }

    #[test]
    fn test_unknown_platform() {
        let db = DatabaseConfig {
            platform: Some("db2".to_string()),
            prefix: None,
        };
        assert!(matches!(db.platform(), Err(ConfigError::UnknownPlatform(_))));
    }

    #[test]
    fn test_load_from_searches_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".config")).unwrap();
        std::fs::write(tmp.path().join(".config/quire.styx"), PAGES).unwrap();
        let nested = tmp.path().join("site/theme");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = load_from(&nested).unwrap();
        assert_eq!(path, tmp.path().join(".config/quire.styx"));
        assert_eq!(config.contenttypes.len(), 2);
    }

    #[test]
    fn test_load_file_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = load_file(&tmp.path().join("nope.styx")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
