use std::collections::{HashMap, HashSet};

use heck::ToSnakeCase;
use indexmap::IndexMap;
use proc_macro2::Span;
use quote::format_ident;

use super::{
    convert::same_type, resolve_column_name, resolve_table_name, Config, ConverterRegistry,
    DefaultExpr, EntityDecl, EntityKind, Error, ErrorSet, Field, NameExpr, SqlTypeExpr,
};

/// How a column's value reaches storage.
#[derive(Debug, Clone)]
pub(crate) enum StorageForm {
    /// Builtin storage type with a plain value binding
    Builtin(SqlTypeExpr),

    /// Conversion through a registered singleton converter
    Converted {
        converter: syn::Ident,
        sql: SqlTypeExpr,
    },

    /// Deferred until the reference target resolves; the storage type is the
    /// target primary key's
    Reference,
}

/// One resolved storage column.
#[derive(Debug)]
pub(crate) struct ColumnMeta {
    /// Resolved storage column name
    pub(crate) name: NameExpr,

    /// Originating property identifier; also the generated accessor name
    pub(crate) property: syn::Ident,

    /// Declared property type, including any `Option` wrapper
    pub(crate) ty: syn::Type,

    /// Property type with the `Option` wrapper stripped
    pub(crate) value_ty: syn::Type,

    pub(crate) nullable: bool,
    pub(crate) mutable: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto: bool,

    pub(crate) storage: StorageForm,

    /// Reference target entity, when this is a reference column
    pub(crate) reference: Option<String>,

    pub(crate) span: Span,
}

/// A declared property with no mapped column: ignored, listed in the
/// entity's ignore-set, or structurally ineligible. Record entities still
/// construct these fields; proxy entities still expose them off the map.
#[derive(Debug)]
pub(crate) struct Unmapped {
    pub(crate) property: syn::Ident,
    pub(crate) ty: syn::Type,
    pub(crate) value_ty: syn::Type,
    pub(crate) nullable: bool,
    pub(crate) phantom: bool,
    pub(crate) default_expr: Option<DefaultExpr>,
}

/// One fully resolved entity. Immutable once resolution completes.
#[derive(Debug)]
pub(crate) struct TableMeta {
    pub(crate) ident: syn::Ident,
    pub(crate) vis: syn::Visibility,
    pub(crate) kind: EntityKind,

    /// Resolved storage table name
    pub(crate) name: NameExpr,

    pub(crate) alias: Option<String>,
    pub(crate) catalog: Option<String>,
    pub(crate) schema: Option<String>,

    /// Generated table descriptor type
    pub(crate) table_ident: syn::Ident,

    /// Generated proxy struct (proxy entities only)
    pub(crate) proxy_ident: syn::Ident,

    /// Generated collection accessor
    pub(crate) accessor_ident: syn::Ident,

    /// Generated sequence extension trait
    pub(crate) sequence_ext_ident: syn::Ident,

    /// Columns in declaration order
    pub(crate) columns: Vec<ColumnMeta>,

    pub(crate) unmapped: Vec<Unmapped>,

    pub(crate) span: Span,
}

impl TableMeta {
    pub(crate) fn primary_keys(&self) -> Vec<&ColumnMeta> {
        self.columns
            .iter()
            .filter(|column| column.primary_key)
            .collect()
    }

    /// The single primary key eligible for executor-generated values:
    /// nullable, mutable, and marked `#[auto]`.
    pub(crate) fn generated_key(&self) -> Option<&ColumnMeta> {
        match self.primary_keys().as_slice() {
            [key] if key.nullable && key.mutable && key.auto => Some(key),
            _ => None,
        }
    }
}

struct PendingReference {
    entity: String,
    property: String,
    target: String,
    value_ty: syn::Type,
    span: Span,
}

/// Resolution context for one generation run: the identity-keyed cache of
/// resolved tables plus the in-progress set that guards cycles. Owned by the
/// driver and discarded at the end of the run.
pub(crate) struct Resolver<'a> {
    decls: &'a IndexMap<String, EntityDecl>,
    config: &'a Config,
    registry: &'a ConverterRegistry,
    enums: &'a HashSet<String>,
    tables: IndexMap<String, TableMeta>,
    resolving: Vec<String>,
    pending: Vec<PendingReference>,
    failed: HashSet<String>,
    errors: Vec<(String, Error)>,
}

/// The resolved output of one run: tables in resolution order plus the
/// entities that failed, each with its error.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub(crate) tables: IndexMap<String, TableMeta>,
    pub(crate) failures: Vec<(String, Error)>,
}

impl Resolution {
    /// The target primary key's storage type and converter for a reference
    /// column, following at most one further reference hop.
    pub(crate) fn reference_storage(
        &self,
        property: &syn::Ident,
        target: &str,
    ) -> Result<(SqlTypeExpr, Option<syn::Ident>), Error> {
        let key = self.target_key(property, target)?;
        let key = match &key.reference {
            Some(hop) => self.target_key(property, hop)?,
            None => key,
        };

        match &key.storage {
            StorageForm::Builtin(sql) => Ok((sql.clone(), None)),
            StorageForm::Converted { converter, sql } => {
                Ok((sql.clone(), Some(converter.clone())))
            }
            StorageForm::Reference => Err(Error::AmbiguousReferenceTarget {
                property: property.to_string(),
                target: target.to_owned(),
                found: 0,
                span: property.span(),
            }),
        }
    }

    /// The resolved storage name of a reference target's primary key.
    pub(crate) fn target_key(
        &self,
        property: &syn::Ident,
        target: &str,
    ) -> Result<&ColumnMeta, Error> {
        let table = self.tables.get(target).ok_or_else(|| Error::UnknownEntity {
            property: property.to_string(),
            target: target.to_owned(),
            span: property.span(),
        })?;

        match table.primary_keys().as_slice() {
            [key] => Ok(key),
            keys => Err(Error::AmbiguousReferenceTarget {
                property: property.to_string(),
                target: target.to_owned(),
                found: keys.len(),
                span: property.span(),
            }),
        }
    }

    pub(crate) fn get(&self, entity: &str) -> Option<&TableMeta> {
        self.tables.get(entity)
    }
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        decls: &'a IndexMap<String, EntityDecl>,
        config: &'a Config,
        registry: &'a ConverterRegistry,
        enums: &'a HashSet<String>,
    ) -> Self {
        Self {
            decls,
            config,
            registry,
            enums,
            tables: IndexMap::new(),
            resolving: Vec::new(),
            pending: Vec::new(),
            failed: HashSet::new(),
            errors: Vec::new(),
        }
    }

    /// Resolves every declared entity, then links and validates references.
    /// A failure is fatal to its entity but unrelated entities still
    /// resolve.
    pub(crate) fn run(mut self) -> Resolution {
        let names: Vec<String> = self.decls.keys().cloned().collect();
        for name in &names {
            self.ensure_resolved(name);
        }
        self.link();

        Resolution {
            tables: self.tables,
            failures: self.errors,
        }
    }

    /// Memoized resolution by entity identity; a cache miss triggers
    /// synchronous recursive resolution.
    fn ensure_resolved(&mut self, name: &str) -> bool {
        if self.tables.contains_key(name) {
            return true;
        }
        if self.failed.contains(name) {
            return false;
        }
        let decls = self.decls;
        let Some(decl) = decls.get(name) else {
            return false;
        };

        self.resolving.push(name.to_owned());
        let result = self.resolve_entity(decl);
        self.resolving.pop();

        match result {
            Ok(table) => {
                self.tables.insert(name.to_owned(), table);
                true
            }
            Err(err) => {
                self.failed.insert(name.to_owned());
                self.errors.push((name.to_owned(), err));
                false
            }
        }
    }

    fn resolve_entity(&mut self, decl: &EntityDecl) -> Result<TableMeta, Error> {
        let entity = decl.ident.to_string();
        let attr = &decl.table_attr;

        let name = resolve_table_name(
            &entity,
            attr.name.as_ref(),
            attr.naming.as_ref(),
            self.config.naming.as_ref(),
        );

        let snake = entity.to_snake_case();
        let accessor_ident = attr.accessor.clone().unwrap_or_else(|| {
            syn::Ident::new(&pluralizer::pluralize(&snake, 2, false), decl.ident.span())
        });

        let mut errs = ErrorSet::new();
        let mut columns: Vec<ColumnMeta> = Vec::new();
        let mut unmapped = Vec::new();
        let mut seen_names: HashMap<String, Span> = HashMap::new();

        for field in &decl.fields {
            if !field.eligible(&attr.ignore) {
                unmapped.push(Unmapped {
                    property: field.name.ident.clone(),
                    ty: field.ty.clone(),
                    value_ty: field.value_ty.clone(),
                    nullable: field.nullable,
                    phantom: field.phantom,
                    default_expr: field.attrs.default_expr.clone(),
                });
                continue;
            }

            match self.resolve_column(&entity, attr.naming.as_ref(), field) {
                Ok(column) => {
                    if let Some(static_name) = column.name.static_name() {
                        if seen_names
                            .insert(static_name.to_owned(), column.span)
                            .is_some()
                        {
                            errs.push(syn::Error::new(
                                column.span,
                                format!("duplicate column name `{static_name}`"),
                            ));
                            continue;
                        }
                    }
                    columns.push(column);
                }
                Err(err) => errs.push(err),
            }
        }

        // Record entities construct every declared field, so an unmapped
        // field needs a usable default.
        if decl.kind == EntityKind::Record {
            for field in &unmapped {
                let usable_default =
                    self.config.allow_default_construction && field.default_expr.is_some();
                if !field.phantom && !usable_default {
                    errs.push(Error::UnmappedConstructorParameter {
                        property: field.property.to_string(),
                        span: field.property.span(),
                    });
                }
            }
        }

        if self.config.update_helpers
            && decl.kind == EntityKind::Record
            && !columns.iter().any(|column| column.primary_key)
        {
            errs.push(Error::MissingUpdateKey {
                entity: entity.clone(),
                span: decl.span,
            });
        }

        errs.collect()?;

        Ok(TableMeta {
            ident: decl.ident.clone(),
            vis: decl.vis.clone(),
            kind: decl.kind,
            name,
            alias: attr.alias.as_ref().map(|lit| lit.value()),
            catalog: attr.catalog.as_ref().map(|lit| lit.value()),
            schema: attr.schema.as_ref().map(|lit| lit.value()),
            table_ident: format_ident!("{}Table", decl.ident),
            proxy_ident: format_ident!("{}Proxy", decl.ident),
            accessor_ident,
            sequence_ext_ident: format_ident!("{}SequenceExt", decl.ident),
            columns,
            unmapped,
            span: decl.span,
        })
    }

    fn resolve_column(
        &mut self,
        entity: &str,
        table_naming: Option<&super::NamingSpec>,
        field: &Field,
    ) -> Result<ColumnMeta, Error> {
        let attr = field.attrs.column.as_ref();
        let explicit_name = attr.and_then(|column| column.name.as_ref());

        let name = resolve_column_name(
            &field.name.raw,
            explicit_name,
            table_naming,
            self.config.naming.as_ref(),
        );

        let (storage, reference) = match &field.attrs.references {
            Some(path) => {
                let target = path
                    .segments
                    .last()
                    .map(|segment| segment.ident.to_string())
                    .unwrap_or_default();

                // Recursively resolve the target unless it is already
                // mid-resolution; a cycle short-circuits through the cache
                // and validation is deferred to the link pass.
                if !self.resolving.contains(&target) {
                    self.ensure_resolved(&target);
                }
                self.pending.push(PendingReference {
                    entity: entity.to_owned(),
                    property: field.name.raw.clone(),
                    target: target.clone(),
                    value_ty: field.value_ty.clone(),
                    span: field.span,
                });

                (StorageForm::Reference, Some(target))
            }
            None => (self.resolve_storage(field)?, None),
        };

        Ok(ColumnMeta {
            name,
            property: field.name.ident.clone(),
            ty: field.ty.clone(),
            value_ty: field.value_ty.clone(),
            nullable: field.nullable,
            mutable: !attr.is_some_and(|column| column.readonly),
            primary_key: field.attrs.key,
            auto: field.attrs.auto,
            storage,
            reference,
            span: field.span,
        })
    }

    /// Maps a property's value type to a storage form: explicit converter
    /// override, then the default enum converter, then a registered
    /// converter for the exact non-nullable type, then the builtin table.
    fn resolve_storage(&self, field: &Field) -> Result<StorageForm, Error> {
        let attr = field.attrs.column.as_ref();
        let explicit_sql = attr.and_then(|column| column.sql.clone());

        if let Some(with) = attr.and_then(|column| column.with.as_ref()) {
            let Some(converter) = with
                .get_ident()
                .and_then(|ident| self.registry.by_ident(ident))
            else {
                return Err(Error::UnknownConverter {
                    name: quote::ToTokens::to_token_stream(with).to_string(),
                    span: field.span,
                });
            };
            return Ok(StorageForm::Converted {
                converter: converter.ident.clone(),
                sql: explicit_sql.unwrap_or_else(|| converter.sql.clone()),
            });
        }

        let is_enum = type_tail(&field.value_ty)
            .is_some_and(|tail| self.enums.contains(&tail));
        if is_enum {
            if let Some(converter) = self.registry.default_enum() {
                return Ok(StorageForm::Converted {
                    converter: converter.ident.clone(),
                    sql: explicit_sql.unwrap_or_else(|| converter.sql.clone()),
                });
            }
        }

        if let Some(converter) = self.registry.for_type(&field.value_ty) {
            return Ok(StorageForm::Converted {
                converter: converter.ident.clone(),
                sql: explicit_sql.unwrap_or_else(|| converter.sql.clone()),
            });
        }

        if let Some(sql) = explicit_sql {
            return Ok(StorageForm::Builtin(sql));
        }

        match SqlTypeExpr::builtin(&field.value_ty) {
            Some(sql) => Ok(StorageForm::Builtin(sql)),
            None => Err(Error::UnresolvedStorageType {
                property: field.name.raw.clone(),
                ty: quote::ToTokens::to_token_stream(&field.value_ty).to_string(),
                span: field.span,
            }),
        }
    }

    /// Validates every deferred reference and the set-wide uniqueness
    /// invariants, failing referring entities whose targets are unusable.
    fn link(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for reference in pending {
            if self.failed.contains(&reference.entity) {
                continue;
            }
            if let Err(err) = self.validate_reference(&reference) {
                self.fail(&reference.entity, err);
            }
        }

        self.check_unique_names();

        // A failure above may orphan entities that referenced the failed
        // one; those cannot keep partial metadata either.
        loop {
            let mut orphaned = Vec::new();
            for (name, table) in &self.tables {
                for column in &table.columns {
                    if let Some(target) = &column.reference {
                        if !self.tables.contains_key(target) {
                            orphaned.push((
                                name.clone(),
                                Error::UnknownEntity {
                                    property: column.property.to_string(),
                                    target: target.clone(),
                                    span: column.span,
                                },
                            ));
                            break;
                        }
                    }
                }
            }
            if orphaned.is_empty() {
                break;
            }
            for (name, err) in orphaned {
                self.fail(&name, err);
            }
        }
    }

    fn validate_reference(&self, reference: &PendingReference) -> Result<(), Error> {
        let Some(target) = self.tables.get(&reference.target) else {
            return Err(Error::UnknownEntity {
                property: reference.property.clone(),
                target: reference.target.clone(),
                span: reference.span,
            });
        };

        // The target must expose exactly one primary key column.
        let key = match target.primary_keys().as_slice() {
            [key] => *key,
            keys => {
                return Err(Error::AmbiguousReferenceTarget {
                    property: reference.property.clone(),
                    target: reference.target.clone(),
                    found: keys.len(),
                    span: reference.span,
                });
            }
        };

        // References resolve to a concrete storage column: a target key
        // that is itself a reference is followed exactly one hop.
        if let Some(hop) = &key.reference {
            let Some(hop_table) = self.tables.get(hop) else {
                return Err(Error::UnknownEntity {
                    property: reference.property.clone(),
                    target: hop.clone(),
                    span: reference.span,
                });
            };
            let hop_key = match hop_table.primary_keys().as_slice() {
                [key] => *key,
                keys => {
                    return Err(Error::AmbiguousReferenceTarget {
                        property: reference.property.clone(),
                        target: hop.clone(),
                        found: keys.len(),
                        span: reference.span,
                    });
                }
            };
            if hop_key.reference.is_some() {
                return Err(Error::AmbiguousReferenceTarget {
                    property: reference.property.clone(),
                    target: reference.target.clone(),
                    found: 0,
                    span: reference.span,
                });
            }
        }

        // The reference column holds the target key's value, so the
        // declared types must agree.
        if !same_type(&reference.value_ty, &key.value_ty) {
            return Err(Error::ConflictingTypeOverride {
                property: reference.property.clone(),
                span: reference.span,
            });
        }

        Ok(())
    }

    fn check_unique_names(&mut self) {
        let mut seen_tables: HashMap<String, String> = HashMap::new();
        let mut seen_types: HashMap<String, String> = HashMap::new();
        let mut duplicates = Vec::new();

        for (entity, table) in &self.tables {
            if let Some(name) = table.name.static_name() {
                if seen_tables
                    .insert(name.to_owned(), entity.clone())
                    .is_some()
                {
                    duplicates.push((
                        entity.clone(),
                        Error::DuplicateTableName {
                            name: name.to_owned(),
                            span: table.span,
                        },
                    ));
                    continue;
                }
            }
            let type_name = table.table_ident.to_string();
            if seen_types.insert(type_name.clone(), entity.clone()).is_some() {
                duplicates.push((
                    entity.clone(),
                    Error::DuplicateTableName {
                        name: type_name,
                        span: table.span,
                    },
                ));
            }
        }

        for (entity, err) in duplicates {
            self.fail(&entity, err);
        }
    }

    fn fail(&mut self, entity: &str, err: Error) {
        self.tables.shift_remove(entity);
        self.failed.insert(entity.to_owned());
        self.errors.push((entity.to_owned(), err));
    }
}

fn type_tail(ty: &syn::Type) -> Option<String> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    path.path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}
