//! Field types and the column recipes they map to.
//!
//! Every field type a content type may declare maps to exactly one
//! [`ColumnRecipe`]. A recipe turns a field name into a [`Column`]; the only
//! input besides the name is the active [`Platform`], and only the text
//! recipe looks at it.

use quire_db_schema::{Column, ColumnDefault, ColumnOptions, Platform, SqlType};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A field type from the content-type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Checkbox,
    Date,
    DateTime,
    Float,
    Number,
    Integer,
    Text,
    TemplateSelect,
    File,
    Slug,
    FileList,
    Geolocation,
    Html,
    Image,
    ImageList,
    Markdown,
    Select,
    Textarea,
    Video,
}

impl FieldType {
    /// Every field type with a recipe, in catalog order.
    pub const ALL: [FieldType; 19] = [
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Float,
        FieldType::Number,
        FieldType::Integer,
        FieldType::Text,
        FieldType::TemplateSelect,
        FieldType::File,
        FieldType::Slug,
        FieldType::FileList,
        FieldType::Geolocation,
        FieldType::Html,
        FieldType::Image,
        FieldType::ImageList,
        FieldType::Markdown,
        FieldType::Select,
        FieldType::Textarea,
        FieldType::Video,
    ];

    /// The name used in content-type definitions.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Float => "float",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Text => "text",
            FieldType::TemplateSelect => "templateselect",
            FieldType::File => "file",
            FieldType::Slug => "slug",
            FieldType::FileList => "filelist",
            FieldType::Geolocation => "geolocation",
            FieldType::Html => "html",
            FieldType::Image => "image",
            FieldType::ImageList => "imagelist",
            FieldType::Markdown => "markdown",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Video => "video",
        }
    }

    /// The recipe that shapes columns for this field type.
    pub fn recipe(&self) -> ColumnRecipe {
        match self {
            FieldType::Checkbox => ColumnRecipe::Boolean,
            FieldType::Date => ColumnRecipe::Date,
            FieldType::DateTime => ColumnRecipe::DateTime,
            FieldType::Float => ColumnRecipe::Float,
            FieldType::Number => ColumnRecipe::Decimal,
            FieldType::Integer => ColumnRecipe::Integer,
            FieldType::Text | FieldType::TemplateSelect | FieldType::File => {
                ColumnRecipe::StringNormal
            }
            FieldType::Slug => ColumnRecipe::StringNullable,
            FieldType::FileList
            | FieldType::Geolocation
            | FieldType::Html
            | FieldType::Image
            | FieldType::ImageList
            | FieldType::Markdown
            | FieldType::Select
            | FieldType::Textarea
            | FieldType::Video => ColumnRecipe::Text,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not in the field-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type `{0}`")]
pub struct UnknownFieldTypeName(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "checkbox" => FieldType::Checkbox,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "float" => FieldType::Float,
            "number" => FieldType::Number,
            "integer" => FieldType::Integer,
            "text" => FieldType::Text,
            "templateselect" => FieldType::TemplateSelect,
            "file" => FieldType::File,
            "slug" => FieldType::Slug,
            "filelist" => FieldType::FileList,
            "geolocation" => FieldType::Geolocation,
            "html" => FieldType::Html,
            "image" => FieldType::Image,
            "imagelist" => FieldType::ImageList,
            "markdown" => FieldType::Markdown,
            "select" => FieldType::Select,
            "textarea" => FieldType::Textarea,
            "video" => FieldType::Video,
            _ => return Err(UnknownFieldTypeName(s.to_string())),
        })
    }
}

/// The column shapes field types are stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRecipe {
    /// `boolean`, default 0
    Boolean,
    /// `date`, nullable
    Date,
    /// `datetime`, nullable
    DateTime,
    /// `float`, default 0
    Float,
    /// `decimal(18, 9)`, default 0
    ///
    /// Deprecated: only kept so existing `number` columns keep their shape.
    Decimal,
    /// `integer`, default 0
    Integer,
    /// `string(256)`, default `''`
    StringNormal,
    /// `string(128)`, nullable, default `''`
    StringNullable,
    /// `text`, default depends on the platform
    Text,
}

impl ColumnRecipe {
    /// Shape the column for `field_name`.
    pub fn column(&self, field_name: &str, platform: &dyn Platform) -> Column {
        let zero = ColumnDefault::Integer(0);
        let (sql_type, options) = match self {
            ColumnRecipe::Boolean => (
                SqlType::Boolean,
                ColumnOptions::new().nullable().default_value(zero),
            ),
            ColumnRecipe::Date => (SqlType::Date, ColumnOptions::new().nullable()),
            ColumnRecipe::DateTime => (SqlType::DateTime, ColumnOptions::new().nullable()),
            ColumnRecipe::Float => (
                SqlType::Float,
                ColumnOptions::new().nullable().default_value(zero),
            ),
            ColumnRecipe::Decimal => (
                SqlType::Decimal,
                ColumnOptions::new()
                    .precision(18, 9)
                    .nullable()
                    .default_value(zero),
            ),
            ColumnRecipe::Integer => (
                SqlType::Integer,
                ColumnOptions::new().nullable().default_value(zero),
            ),
            ColumnRecipe::StringNormal => (
                SqlType::String,
                ColumnOptions::new()
                    .length(256)
                    .nullable()
                    .default_value(ColumnDefault::empty_string()),
            ),
            ColumnRecipe::StringNullable => (
                SqlType::String,
                ColumnOptions::new()
                    .length(128)
                    .nullable()
                    .default_value(ColumnDefault::empty_string()),
            ),
            ColumnRecipe::Text => (
                SqlType::Text,
                ColumnOptions::new()
                    .nullable()
                    .default_value_opt(text_default(platform)),
            ),
        };
        Column::new(field_name, sql_type, options)
    }
}

/// Default for TEXT columns on the given platform.
fn text_default(platform: &dyn Platform) -> Option<ColumnDefault> {
    platform
        .requires_empty_text_default()
        .then(ColumnDefault::empty_string)
}

/// Lookup from field-type names to recipes.
///
/// The registry is fixed: it knows exactly the types in [`FieldType::ALL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    pub const fn new() -> Self {
        TypeRegistry
    }

    /// Whether `field_type` has a recipe.
    ///
    /// Callers use this to validate content-type definitions before building
    /// a table, and to tell schema-bearing fields from the rest.
    pub fn is_known_type(&self, field_type: &str) -> bool {
        self.field_type(field_type).is_some()
    }

    /// Resolve a field-type name.
    pub fn field_type(&self, field_type: &str) -> Option<FieldType> {
        field_type.parse().ok()
    }

    /// The recipe registered for `field_type`, if any.
    pub fn recipe(&self, field_type: &str) -> Option<ColumnRecipe> {
        self.field_type(field_type).map(|t| t.recipe())
    }

    /// All registered field types.
    pub fn field_types(&self) -> impl Iterator<Item = FieldType> {
        FieldType::ALL.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quire_db_schema::PlatformKind;

    #[test]
    fn test_every_field_type_is_known() {
        let registry = TypeRegistry::new();
        for t in FieldType::ALL {
            assert!(registry.is_known_type(t.name()), "{} should be known", t);
            assert_eq!(registry.field_type(t.name()), Some(t));
        }
    }

    #[test]
    fn test_unknown_types() {
        let registry = TypeRegistry::new();
        for name in ["", "unknown_type", "Text", "repeater", "block", " text"] {
            assert!(!registry.is_known_type(name), "{:?} should be unknown", name);
            assert_eq!(registry.recipe(name), None);
        }
    }

    #[test]
    fn test_parse_unknown_field_type_name() {
        let err = "repeater".parse::<FieldType>().unwrap_err();
        assert_eq!(err, UnknownFieldTypeName("repeater".to_string()));
        assert_eq!(err.to_string(), "unknown field type `repeater`");
        assert_eq!("markdown".parse::<FieldType>(), Ok(FieldType::Markdown));
    }

    #[test]
    fn test_string_recipes_share() {
        let registry = TypeRegistry::new();
        for name in ["text", "templateselect", "file"] {
            assert_eq!(registry.recipe(name), Some(ColumnRecipe::StringNormal));
        }
        assert_eq!(registry.recipe("slug"), Some(ColumnRecipe::StringNullable));
    }

    #[test]
    fn test_text_recipes() {
        let registry = TypeRegistry::new();
        for name in [
            "filelist",
            "geolocation",
            "html",
            "image",
            "imagelist",
            "markdown",
            "select",
            "textarea",
            "video",
        ] {
            assert_eq!(registry.recipe(name), Some(ColumnRecipe::Text), "{}", name);
        }
    }

    #[test]
    fn test_decimal_recipe() {
        let col = ColumnRecipe::Decimal.column("price", &PlatformKind::MySql);
        assert_eq!(col.name, "price");
        assert_eq!(col.sql_type, SqlType::Decimal);
        assert_eq!(col.options.precision, Some(18));
        assert_eq!(col.options.scale, Some(9));
        assert_eq!(col.options.default, Some(ColumnDefault::Integer(0)));
    }

    #[test]
    fn test_text_default_per_platform() {
        for kind in PlatformKind::ALL {
            let col = ColumnRecipe::Text.column("body", &kind);
            assert_eq!(col.sql_type, SqlType::Text);
            assert!(col.nullable());
            match kind {
                PlatformKind::Sqlite | PlatformKind::PostgreSql => {
                    assert_eq!(col.options.default, Some(ColumnDefault::empty_string()))
                }
                _ => assert_eq!(col.options.default, None),
            }
        }
    }

    #[test]
    fn test_only_text_recipe_depends_on_platform() {
        for recipe in FieldType::ALL.map(|t| t.recipe()) {
            let a = recipe.column("f", &PlatformKind::Sqlite);
            let b = recipe.column("f", &PlatformKind::Oracle);
            assert_eq!(a == b, recipe != ColumnRecipe::Text, "{:?}", recipe);
        }
    }

    proptest! {
        #[test]
        fn prop_is_known_type_matches_catalog(name in "[a-z_]{0,16}") {
            let registry = TypeRegistry::new();
            let in_catalog = FieldType::ALL.iter().any(|t| t.name() == name);
            prop_assert_eq!(registry.is_known_type(&name), in_catalog);
        }

        #[test]
        fn prop_recipes_keep_field_name(name in "[a-z][a-z0-9_]{0,30}") {
            for t in FieldType::ALL {
                let col = t.recipe().column(&name, &PlatformKind::PostgreSql);
                prop_assert_eq!(&col.name, &name);
                prop_assert!(col.nullable());
            }
        }
    }
}
