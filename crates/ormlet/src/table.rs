use crate::{Condition, IntoValue, Result, SqlType, Value};

/// Storage identity of one relational table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    name: String,
    alias: Option<String>,
    catalog: Option<String>,
    schema: Option<String>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            catalog: None,
            schema: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn catalog_name(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// `catalog.schema.name`, omitting absent qualifiers.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        if let Some(catalog) = &self.catalog {
            out.push_str(catalog);
            out.push('.');
        }
        if let Some(schema) = &self.schema {
            out.push_str(schema);
            out.push('.');
        }
        out.push_str(&self.name);
        out
    }
}

/// Reference binding from a column to another table's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

struct Binding<E> {
    get: fn(&E) -> Value,
    set: fn(&mut E, Value) -> Result<()>,
}

/// One storage column of a table descriptor, optionally bound to the
/// originating entity property.
pub struct Column<E> {
    name: String,
    sql_type: SqlType,
    nullable: bool,
    mutable: bool,
    primary_key: bool,
    auto: bool,
    references: Option<ColumnRef>,
    binding: Option<Binding<E>>,
}

impl<E> Column<E> {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: false,
            mutable: true,
            primary_key: false,
            auto: false,
            references: None,
            binding: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.mutable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ColumnRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    pub fn bind(mut self, get: fn(&E) -> Value, set: fn(&mut E, Value) -> Result<()>) -> Self {
        self.binding = Some(Binding { get, set });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql_type(&self) -> &SqlType {
        &self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn reference(&self) -> Option<&ColumnRef> {
        self.references.as_ref()
    }

    pub fn is_reference(&self) -> bool {
        self.references.is_some()
    }

    /// Reads the bound property value off an entity; `Null` for an unbound
    /// column.
    pub fn read(&self, entity: &E) -> Value {
        match &self.binding {
            Some(binding) => (binding.get)(entity),
            None => Value::Null,
        }
    }

    /// Writes a storage value back onto the bound property.
    pub fn write(&self, entity: &mut E, value: Value) -> Result<()> {
        match &self.binding {
            Some(binding) => (binding.set)(entity, value),
            None => Ok(()),
        }
    }

    pub fn eq(&self, value: impl IntoValue) -> Condition {
        Condition::Eq {
            column: self.name.clone(),
            value: value.into_value(),
        }
    }
}

impl<E> std::fmt::Debug for Column<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("sql_type", &self.sql_type)
            .field("nullable", &self.nullable)
            .field("mutable", &self.mutable)
            .field("primary_key", &self.primary_key)
            .field("auto", &self.auto)
            .field("references", &self.references)
            .finish()
    }
}

/// Generated table descriptor types implement this to expose their identity
/// and column set.
pub trait Table {
    type Entity;

    fn descriptor(&self) -> &TableDescriptor;

    /// Columns in declaration order.
    fn columns(&self) -> Vec<&Column<Self::Entity>>;

    fn primary_key_columns(&self) -> Vec<&Column<Self::Entity>> {
        self.columns()
            .into_iter()
            .filter(|column| column.is_primary_key())
            .collect()
    }
}
