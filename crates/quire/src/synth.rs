//! The schema synthesizer.
//!
//! [`SchemaSynthesizer`] drives a [`TableBuilder`] through the system columns
//! every content-type table has, then through the columns derived from the
//! content type's own fields.

use crate::registry::{FieldType, TypeRegistry};
use crate::{ContentType, Error, Result};
use quire_db_schema::{
    Column, ColumnDefault, ColumnOptions, Platform, SqlType, Table, TableBuilder,
};
use tracing::{debug, info, trace};

/// Name of the system slug column.
pub const SLUG_COLUMN: &str = "slug";

/// Columns indexed on every content-type table, in declaration order.
pub const INDEXED_COLUMNS: [&str; 6] = [
    "slug",
    "datecreated",
    "datechanged",
    "datepublish",
    "datedepublish",
    "status",
];

/// Primary key of every content-type table.
pub const PRIMARY_KEY: [&str; 1] = ["id"];

/// The system columns every content-type table starts with, in order.
///
/// Query layers rely on these names, so they are part of the public contract.
pub fn fixed_columns() -> [Column; 10] {
    [
        Column::new("id", SqlType::Integer, ColumnOptions::new().autoincrement()),
        Column::new(SLUG_COLUMN, SqlType::String, ColumnOptions::new().length(128)),
        Column::new("datecreated", SqlType::DateTime, ColumnOptions::new()),
        Column::new("datechanged", SqlType::DateTime, ColumnOptions::new()),
        Column::new(
            "datepublish",
            SqlType::DateTime,
            ColumnOptions::new()
                .nullable()
                .default_value(ColumnDefault::Null),
        ),
        Column::new(
            "datedepublish",
            SqlType::DateTime,
            ColumnOptions::new()
                .nullable()
                .default_value(ColumnDefault::Null),
        ),
        Column::new(
            "templatefields",
            SqlType::Text,
            ColumnOptions::new().default_value(ColumnDefault::empty_string()),
        ),
        // Legacy: superseded by `ownerid`, still read by older content.
        Column::new(
            "username",
            SqlType::String,
            ColumnOptions::new()
                .length(32)
                .nullable()
                .default_value(ColumnDefault::empty_string()),
        ),
        Column::new("ownerid", SqlType::Integer, ColumnOptions::new().nullable()),
        Column::new("status", SqlType::String, ColumnOptions::new().length(32)),
    ]
}

/// Derives content-type table schemas for one platform.
///
/// The synthesizer holds no state besides the registry and the platform, so
/// one instance can serve any number of builds, including concurrent ones on
/// separate builders.
pub struct SchemaSynthesizer<'p> {
    registry: TypeRegistry,
    platform: &'p (dyn Platform + Sync),
}

impl<'p> SchemaSynthesizer<'p> {
    /// Create a synthesizer for the given platform.
    pub fn new(platform: &'p (dyn Platform + Sync)) -> Self {
        Self {
            registry: TypeRegistry::new(),
            platform,
        }
    }

    /// The type registry in use.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The platform columns are shaped for.
    pub fn platform(&self) -> &dyn Platform {
        self.platform
    }

    /// Whether `field_type` produces a column.
    pub fn is_known_type(&self, field_type: &str) -> bool {
        self.registry.is_known_type(field_type)
    }

    /// Declare the system columns.
    pub fn define_fixed_schema(&self, table: &mut dyn TableBuilder) -> Result<()> {
        for column in fixed_columns() {
            emit_column(table, column)?;
        }
        Ok(())
    }

    /// Declare the single-column indexes on the system columns.
    pub fn define_indexes(&self, table: &mut dyn TableBuilder) -> Result<()> {
        for column in INDEXED_COLUMNS {
            table.add_index(&[column])?;
        }
        Ok(())
    }

    /// Declare `id` as the primary key.
    pub fn define_primary_key(&self, table: &mut dyn TableBuilder) -> Result<()> {
        table.set_primary_key(&PRIMARY_KEY)?;
        Ok(())
    }

    /// Declare the column for one content-type field, and its index if asked.
    ///
    /// Adding the same field twice is left to the builder to reject.
    pub fn add_custom_field(
        &self,
        table: &mut dyn TableBuilder,
        field_name: &str,
        field_type: &str,
        add_index: bool,
    ) -> Result<()> {
        let Some(ty) = self.registry.field_type(field_type) else {
            return Err(Error::UnknownFieldType {
                field: field_name.to_string(),
                field_type: field_type.to_string(),
            });
        };

        // A content type's own `slug` field is the system slug column, which
        // define_fixed_schema already declared and define_indexes already
        // indexed. Declaring it again would be a duplicate column.
        if ty == FieldType::Slug && field_name == SLUG_COLUMN {
            trace!(field = %field_name, "slug field maps to the system column, skipping");
            return Ok(());
        }

        emit_column(table, ty.recipe().column(field_name, self.platform))?;

        if add_index {
            table.add_index(&[field_name])?;
        }
        Ok(())
    }

    /// Declare the full table for a content type.
    ///
    /// Every field type is checked before anything is declared, so an unknown
    /// type leaves the builder untouched.
    pub fn build_content_type(
        &self,
        table: &mut dyn TableBuilder,
        content_type: &ContentType,
    ) -> Result<()> {
        if let Some(field) = content_type
            .fields
            .iter()
            .find(|f| !self.is_known_type(&f.field_type))
        {
            return Err(Error::UnknownFieldType {
                field: field.name.clone(),
                field_type: field.field_type.clone(),
            });
        }

        self.define_fixed_schema(table)?;
        self.define_indexes(table)?;
        self.define_primary_key(table)?;

        for field in &content_type.fields {
            self.add_custom_field(table, &field.name, &field.field_type, field.index)?;
        }
        Ok(())
    }

    /// Build the in-memory table for a content type, named `{prefix}{table}`.
    pub fn synthesize(&self, content_type: &ContentType, prefix: &str) -> Result<Table> {
        let mut table = Table::new(content_type.table_name(prefix));
        self.build_content_type(&mut table, content_type)?;
        info!(
            content_type = %content_type.name,
            table = %table.name,
            platform = %self.platform.kind(),
            columns = table.columns.len(),
            indices = table.indices.len(),
            "synthesized content-type table"
        );
        Ok(table)
    }
}

fn emit_column(table: &mut dyn TableBuilder, column: Column) -> Result<()> {
    debug!(column = %column.name, sql_type = %column.sql_type, "declare column");
    table.add_column(&column.name, column.sql_type, column.options)?;
    Ok(())
}
