/// A content type: a named list of typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Key the content type is configured under (e.g. `pages`)
    pub name: String,
    /// Table name override, without prefix
    pub table_name: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl ContentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: None,
            fields: Vec::new(),
        }
    }

    /// Store the content type in `table_name` instead of its own name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Append a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// The physical table name: `prefix` followed by the table name, with
    /// dashes turned into underscores.
    ///
    /// ```
    /// use quire::ContentType;
    ///
    /// assert_eq!(ContentType::new("blog-posts").table_name("bolt_"), "bolt_blog_posts");
    /// assert_eq!(
    ///     ContentType::new("pages").with_table_name("page").table_name(""),
    ///     "page"
    /// );
    /// ```
    pub fn table_name(&self, prefix: &str) -> String {
        let base = self.table_name.as_deref().unwrap_or(&self.name);
        format!("{}{}", prefix, base.replace('-', "_"))
    }
}

/// One field of a content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field (and column) name
    pub name: String,
    /// Field type name, resolved through the type registry
    pub field_type: String,
    /// Whether the column gets its own index
    pub index: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            index: false,
        }
    }

    /// Request an index on this field's column.
    pub fn indexed(mut self) -> Self {
        self.index = true;
        self
    }
}
