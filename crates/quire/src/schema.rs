//! DDL rendering for synthesized tables.
//!
//! Column types are portable ([`SqlType`]); this module maps them to each
//! platform's own types and renders `CREATE TABLE` / `CREATE INDEX`.

use quire_db_schema::{Column, ColumnDefault, Index, PlatformKind, SqlType, Table};
use quire_sql::quote_ident;

/// Length used for `string` columns that don't declare one.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

fn ident(name: &str, platform: PlatformKind) -> String {
    quote_ident(name, platform.quote_style())
}

/// The platform's type for a column, including identity/serial handling.
///
/// On SQLite, autoincrement is expressed by `PRIMARY KEY AUTOINCREMENT`
/// rather than by the type, see [`create_table_sql`].
pub fn column_type_sql(column: &Column, platform: PlatformKind) -> String {
    let opts = &column.options;

    if opts.autoincrement && column.sql_type == SqlType::Integer {
        match platform {
            PlatformKind::PostgreSql => return "SERIAL".to_string(),
            PlatformKind::MySql => return "INT AUTO_INCREMENT".to_string(),
            PlatformKind::SqlServer => return "INT IDENTITY(1, 1)".to_string(),
            PlatformKind::Oracle => {
                return "NUMBER(10) GENERATED BY DEFAULT AS IDENTITY".to_string();
            }
            PlatformKind::Sqlite => {}
        }
    }

    match column.sql_type {
        SqlType::Integer => match platform {
            PlatformKind::Sqlite => "INTEGER".to_string(),
            PlatformKind::Oracle => "NUMBER(10)".to_string(),
            _ => "INT".to_string(),
        },
        SqlType::String => {
            let len = opts.length.unwrap_or(DEFAULT_STRING_LENGTH);
            match platform {
                PlatformKind::SqlServer => format!("NVARCHAR({})", len),
                PlatformKind::Oracle => format!("VARCHAR2({})", len),
                _ => format!("VARCHAR({})", len),
            }
        }
        SqlType::Text => match platform {
            PlatformKind::Sqlite | PlatformKind::Oracle => "CLOB".to_string(),
            PlatformKind::PostgreSql => "TEXT".to_string(),
            PlatformKind::MySql => "LONGTEXT".to_string(),
            PlatformKind::SqlServer => "VARCHAR(MAX)".to_string(),
        },
        SqlType::Boolean => match platform {
            PlatformKind::Sqlite | PlatformKind::PostgreSql => "BOOLEAN".to_string(),
            PlatformKind::MySql => "TINYINT(1)".to_string(),
            PlatformKind::SqlServer => "BIT".to_string(),
            PlatformKind::Oracle => "NUMBER(1)".to_string(),
        },
        SqlType::Date => "DATE".to_string(),
        SqlType::DateTime => match platform {
            PlatformKind::Sqlite | PlatformKind::MySql => "DATETIME".to_string(),
            PlatformKind::PostgreSql => "TIMESTAMP(0) WITHOUT TIME ZONE".to_string(),
            PlatformKind::SqlServer => "DATETIME2(6)".to_string(),
            PlatformKind::Oracle => "TIMESTAMP(0)".to_string(),
        },
        SqlType::Float => match platform {
            PlatformKind::SqlServer => "FLOAT".to_string(),
            _ => "DOUBLE PRECISION".to_string(),
        },
        SqlType::Decimal => format!(
            "NUMERIC({}, {})",
            opts.precision.unwrap_or(10),
            opts.scale.unwrap_or(0)
        ),
    }
}

/// The `DEFAULT` expression for a column, if it has one.
///
/// Boolean defaults are stored as `0`/`1`; PostgreSQL wants `false`/`true`.
/// MySQL does not accept a default on `TEXT` columns, so none is rendered.
pub fn default_sql(column: &Column, platform: PlatformKind) -> Option<String> {
    let default = column.options.default.as_ref()?;
    match (column.sql_type, platform, default) {
        (SqlType::Text, PlatformKind::MySql, _) => None,
        (SqlType::Boolean, PlatformKind::PostgreSql, ColumnDefault::Integer(n)) => {
            let literal = if *n == 0 { "false" } else { "true" };
            Some(literal.to_string())
        }
        _ => Some(default.to_string()),
    }
}

/// Generate the `CREATE TABLE` statement.
///
/// Single-column primary keys are declared inline, composite ones as a table
/// constraint. Indices are separate statements, see [`create_index_sql`].
pub fn create_table_sql(table: &Table, platform: PlatformKind) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", ident(&table.name, platform));

    let use_table_pk_constraint = table.primary_key.len() > 1;

    let mut parts: Vec<String> = table
        .columns
        .values()
        .map(|col| {
            let mut def = format!(
                "    {} {}",
                ident(&col.name, platform),
                column_type_sql(col, platform)
            );

            let inline_pk = table.is_primary_key(&col.name) && !use_table_pk_constraint;
            if inline_pk {
                def.push_str(" PRIMARY KEY");
                if col.options.autoincrement && platform == PlatformKind::Sqlite {
                    def.push_str(" AUTOINCREMENT");
                }
            }

            // Oracle requires DEFAULT before any constraint.
            if let Some(default) = default_sql(col, platform) {
                def.push_str(&format!(" DEFAULT {}", default));
            }

            // Inline primary keys are implicitly NOT NULL.
            if col.options.notnull && !inline_pk {
                def.push_str(" NOT NULL");
            }

            def
        })
        .collect();

    if use_table_pk_constraint {
        let quoted: Vec<_> = table
            .primary_key
            .iter()
            .map(|c| ident(c, platform))
            .collect();
        parts.push(format!("    PRIMARY KEY ({})", quoted.join(", ")));
    }

    sql.push_str(&parts.join(",\n"));
    sql.push_str("\n);");
    sql
}

/// Generate the `CREATE INDEX` statement for one index.
pub fn create_index_sql(table: &Table, idx: &Index, platform: PlatformKind) -> String {
    let cols: Vec<_> = idx.columns.iter().map(|c| ident(c, platform)).collect();
    format!(
        "CREATE INDEX {} ON {} ({});",
        ident(&idx.name, platform),
        ident(&table.name, platform),
        cols.join(", ")
    )
}

/// Generate the table and all of its indices, one statement per line group.
pub fn table_to_sql(table: &Table, platform: PlatformKind) -> String {
    let mut out = create_table_sql(table, platform);
    for idx in &table.indices {
        out.push('\n');
        out.push_str(&create_index_sql(table, idx, platform));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_db_schema::{ColumnOptions, TableBuilder};

    fn small_table() -> Table {
        let mut t = Table::new("bolt_pages");
        t.add_column("id", SqlType::Integer, ColumnOptions::new().autoincrement())
            .unwrap();
        t.add_column("slug", SqlType::String, ColumnOptions::new().length(128))
            .unwrap();
        t.add_column(
            "featured",
            SqlType::Boolean,
            ColumnOptions::new()
                .nullable()
                .default_value(ColumnDefault::Integer(0)),
        )
        .unwrap();
        t.add_index(&["slug"]).unwrap();
        t.set_primary_key(&["id"]).unwrap();
        t
    }

    #[test]
    fn test_table_sqlite() {
        let sql = table_to_sql(&small_table(), PlatformKind::Sqlite);
        insta::assert_snapshot!(sql, @r#"
        CREATE TABLE "bolt_pages" (
            "id" INTEGER PRIMARY KEY AUTOINCREMENT,
            "slug" VARCHAR(128) NOT NULL,
            "featured" BOOLEAN DEFAULT 0
        );
        CREATE INDEX "idx_bolt_pages_slug" ON "bolt_pages" ("slug");
        "#);
    }

    #[test]
    fn test_table_postgres() {
        let sql = table_to_sql(&small_table(), PlatformKind::PostgreSql);
        insta::assert_snapshot!(sql, @r#"
        CREATE TABLE "bolt_pages" (
            "id" SERIAL PRIMARY KEY,
            "slug" VARCHAR(128) NOT NULL,
            "featured" BOOLEAN DEFAULT false
        );
        CREATE INDEX "idx_bolt_pages_slug" ON "bolt_pages" ("slug");
        "#);
    }

    #[test]
    fn test_table_mysql() {
        let sql = table_to_sql(&small_table(), PlatformKind::MySql);
        insta::assert_snapshot!(sql, @r"
        CREATE TABLE `bolt_pages` (
            `id` INT AUTO_INCREMENT PRIMARY KEY,
            `slug` VARCHAR(128) NOT NULL,
            `featured` TINYINT(1) DEFAULT 0
        );
        CREATE INDEX `idx_bolt_pages_slug` ON `bolt_pages` (`slug`);
        ");
    }

    #[test]
    fn test_default_precedes_not_null() {
        let mut t = Table::new("t");
        t.add_column(
            "status",
            SqlType::String,
            ColumnOptions::new()
                .length(32)
                .default_value(ColumnDefault::String("draft".to_string())),
        )
        .unwrap();

        let sql = create_table_sql(&t, PlatformKind::Oracle);
        insta::assert_snapshot!(sql, @r#"
        CREATE TABLE "t" (
            "status" VARCHAR2(32) DEFAULT 'draft' NOT NULL
        );
        "#);
    }

    #[test]
    fn test_composite_primary_key() {
        let mut t = Table::new("link");
        t.add_column("a", SqlType::Integer, ColumnOptions::new())
            .unwrap();
        t.add_column("b", SqlType::Integer, ColumnOptions::new())
            .unwrap();
        t.set_primary_key(&["a", "b"]).unwrap();

        let sql = create_table_sql(&t, PlatformKind::SqlServer);
        insta::assert_snapshot!(sql, @r"
        CREATE TABLE [link] (
            [a] INT NOT NULL,
            [b] INT NOT NULL,
            PRIMARY KEY ([a], [b])
        );
        ");
    }

    #[test]
    fn test_column_types_per_platform() {
        let text = Column::new("body", SqlType::Text, ColumnOptions::new());
        let types: Vec<_> = PlatformKind::ALL
            .into_iter()
            .map(|p| column_type_sql(&text, p))
            .collect();
        assert_eq!(types, vec!["CLOB", "TEXT", "LONGTEXT", "VARCHAR(MAX)", "CLOB"]);

        let decimal = Column::new(
            "price",
            SqlType::Decimal,
            ColumnOptions::new().precision(18, 9),
        );
        assert_eq!(
            column_type_sql(&decimal, PlatformKind::Oracle),
            "NUMERIC(18, 9)"
        );

        let string = Column::new("title", SqlType::String, ColumnOptions::new());
        assert_eq!(
            column_type_sql(&string, PlatformKind::Oracle),
            "VARCHAR2(255)"
        );
    }

    #[test]
    fn test_default_sql() {
        let col = Column::new(
            "teaser",
            SqlType::Text,
            ColumnOptions::new().default_value(ColumnDefault::empty_string()),
        );
        assert_eq!(default_sql(&col, PlatformKind::Sqlite).as_deref(), Some("''"));

        assert_eq!(default_sql(&col, PlatformKind::MySql), None);
        assert_eq!(default_sql(&col, PlatformKind::Oracle).as_deref(), Some("''"));

        let col = Column::new("teaser", SqlType::Text, ColumnOptions::new());
        assert_eq!(default_sql(&col, PlatformKind::Sqlite), None);

        let col = Column::new(
            "datepublish",
            SqlType::DateTime,
            ColumnOptions::new()
                .nullable()
                .default_value(ColumnDefault::Null),
        );
        assert_eq!(
            default_sql(&col, PlatformKind::PostgreSql).as_deref(),
            Some("NULL")
        );
    }
}
