use clap::{Parser, Subcommand};
use quire::config::{self, Config};
use quire::schema::table_to_sql;
use quire::{ConfigError, ContentType, PlatformKind, SchemaSynthesizer, TypeRegistry};
use std::path::PathBuf;
use tracing::{error, info};

/// Derive SQL tables from content-type definitions.
#[derive(Parser, Debug)]
#[command(name = "quire", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print CREATE TABLE / CREATE INDEX statements for every content type
    Schema {
        /// Config file (default: search for .config/quire.styx upwards)
        #[arg(long, env = "QUIRE_CONFIG")]
        config: Option<PathBuf>,

        /// Target platform, overrides `database.platform`
        #[arg(long)]
        platform: Option<String>,

        /// Only this content type
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List the field types that produce a column
    Types,
}

fn main() {
    // stdout carries the DDL, logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quire=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Schema {
            config,
            platform,
            content_type,
        } => schema(config, platform, content_type),
        Commands::Types => {
            types();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> quire::Result<Config> {
    match path {
        Some(path) => Ok(config::load_file(&path)?),
        None => {
            let (config, path) = config::load()?;
            info!(path = %path.display(), "using config");
            Ok(config)
        }
    }
}

fn schema(
    config_path: Option<PathBuf>,
    platform: Option<String>,
    only: Option<String>,
) -> quire::Result<()> {
    let config = load_config(config_path)?;

    let platform: PlatformKind = match platform {
        Some(name) => name.parse::<PlatformKind>().map_err(ConfigError::from)?,
        None => config.database.platform()?,
    };
    let prefix = config.database.prefix();

    let synth = SchemaSynthesizer::new(&platform);
    let content_types = select_content_types(&config, only.as_deref())?;

    if content_types.is_empty() {
        println!("-- No content types configured.");
        return Ok(());
    }

    // Synthesize everything before printing anything.
    let tables = content_types
        .iter()
        .map(|ct| synth.synthesize(ct, prefix))
        .collect::<quire::Result<Vec<_>>>()?;

    println!("-- platform: {}", platform);
    for table in &tables {
        println!();
        println!("{}", table_to_sql(table, platform));
    }
    Ok(())
}

/// All configured content types, or just `only` if given.
fn select_content_types(
    config: &Config,
    only: Option<&str>,
) -> quire::Result<Vec<ContentType>> {
    let all = config.content_types();
    let Some(name) = only else {
        return Ok(all);
    };
    match all.into_iter().find(|ct| ct.name == name) {
        Some(ct) => Ok(vec![ct]),
        None => Err(ConfigError::UnknownContentType(name.to_string()).into()),
    }
}

fn types() {
    let registry = TypeRegistry::new();
    for field_type in registry.field_types() {
        println!("{:<16} {:?}", field_type.name(), field_type.recipe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn two_types() -> Config {
        let mut cfg = Config::default();
        for name in ["pages", "entries"] {
            cfg.contenttypes
                .insert(name.to_string(), config::ContentTypeConfig::default());
        }
        cfg
    }

    #[test]
    fn test_select_all_content_types() {
        let selected = select_content_types(&two_types(), None).unwrap();
        let names: Vec<_> = selected.iter().map(|ct| ct.name.as_str()).collect();
        assert_eq!(names, vec!["pages", "entries"]);
    }

    #[test]
    fn test_select_one_content_type() {
        let selected = select_content_types(&two_types(), Some("entries")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "entries");
    }

    #[test]
    fn test_select_unknown_content_type() {
        let err = select_content_types(&two_types(), Some("nope")).unwrap_err();
        assert!(matches!(
            err,
            quire::Error::Config(ConfigError::UnknownContentType(ref name)) if name == "nope"
        ));
        assert_eq!(err.to_string(), "content type `nope` is not configured");
    }

    #[test]
    fn test_parse_schema_args() {
        let cli = Cli::parse_from([
            "quire",
            "schema",
            "--platform",
            "mysql",
            "--content-type",
            "pages",
        ]);
        match cli.command {
            Commands::Schema {
                platform,
                content_type,
                ..
            } => {
                assert_eq!(platform.as_deref(), Some("mysql"));
                assert_eq!(content_type.as_deref(), Some("pages"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
