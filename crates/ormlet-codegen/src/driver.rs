use std::collections::HashSet;
use std::path::{Path, PathBuf};

use heck::ToSnakeCase;
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;

use crate::expand;
use crate::schema::{
    Config, ConverterDef, ConverterRegistry, EntityDecl, Error, Resolution, Resolver,
};

/// Attributes consumed by the generator and stripped from re-emitted items.
const ORMLET_ATTRS: &[&str] = &[
    "entity",
    "table",
    "key",
    "auto",
    "references",
    "column",
    "default",
    "ignore",
    "converter",
    "database",
];

struct SchemaInput {
    items: Vec<syn::Item>,
}

impl syn::parse::Parse for SchemaInput {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Self { items })
    }
}

/// One discovered-and-resolved generation run.
struct Run {
    config: Config,
    resolution: Resolution,
    cleaned: Vec<syn::Item>,
}

/// Expands a schema module: the user's declarations with generator
/// attributes stripped, followed by the generated mapping declarations.
/// Failures of individual entities become `compile_error!` invocations
/// alongside the successful entities' output.
pub fn generate(input: TokenStream) -> syn::Result<TokenStream> {
    let schema: SchemaInput = syn::parse2(input)?;

    let (run, mut failures) = run_items(schema.items).map_err(Error::into_syn)?;

    let cleaned = &run.cleaned;
    let mut output = quote! {
        #(#cleaned)*
    };

    for table in run.resolution.tables.values() {
        match expand::entity(table, &run.resolution, &run.config) {
            Ok(tokens) => output.extend(tokens),
            Err(err) => failures.push((table.ident.to_string(), err)),
        }
    }

    for (_, err) in failures {
        output.extend(err.into_syn().to_compile_error());
    }

    Ok(output)
}

/// Discovers declarations, resolves metadata, and validates references.
/// Configuration problems abort the run; entity problems are returned as
/// per-entity failures.
fn run_items(mut items: Vec<syn::Item>) -> Result<(Run, Vec<(String, Error)>), Error> {
    let mut config: Option<Config> = None;
    let mut declared_converters: Vec<ConverterDef> = Vec::new();
    let mut decls: IndexMap<String, EntityDecl> = IndexMap::new();
    let mut enums: HashSet<String> = HashSet::new();
    let mut failures: Vec<(String, Error)> = Vec::new();
    let mut scrub_indices: Vec<usize> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if let Some(attr) = find_attr(item, "database") {
            if config.is_some() {
                return Err(Error::DuplicateConfig {
                    span: syn::spanned::Spanned::span(attr),
                });
            }
            config = Some(Config::from_ast(attr)?);
            scrub_indices.push(index);
            continue;
        }

        if let Some(attr) = find_attr(item, "converter") {
            match item {
                syn::Item::Struct(strukt) => match ConverterDef::from_ast(strukt, attr) {
                    Ok(converter) => declared_converters.push(converter),
                    Err(err) => return Err(err),
                },
                other => {
                    return Err(Error::ConverterNotSingleton {
                        converter: item_name(other),
                        span: syn::spanned::Spanned::span(other),
                    });
                }
            }
            scrub_indices.push(index);
            continue;
        }

        if find_attr(item, "entity").is_some() {
            match EntityDecl::from_item(item) {
                Ok(decl) => {
                    decls.insert(decl.ident.to_string(), decl);
                }
                Err(err) => failures.push((item_name(item), err)),
            }
            scrub_indices.push(index);
            continue;
        }

        // Plain enum declarations feed the type mapper's enumeration check.
        if let syn::Item::Enum(item) = item {
            enums.insert(item.ident.to_string());
        }
    }

    let config = config.ok_or(Error::MissingConfig)?;

    // Every converter named in configuration must be declared.
    for name in config
        .converters
        .iter()
        .chain(config.default_enum_converter.as_ref())
    {
        if !declared_converters.iter().any(|def| def.ident == *name) {
            return Err(Error::UnknownConverter {
                name: name.to_string(),
                span: name.span(),
            });
        }
    }

    let registry = ConverterRegistry::new(
        declared_converters,
        config.converters.clone(),
        config.default_enum_converter.clone(),
    );

    let Resolution {
        tables,
        failures: resolution_failures,
    } = Resolver::new(&decls, &config, &registry, &enums).run();
    failures.extend(resolution_failures);

    for index in scrub_indices {
        scrub_item(&mut items[index]);
    }

    Ok((
        Run {
            config,
            resolution: Resolution {
                tables,
                failures: Vec::new(),
            },
            cleaned: items,
        },
        failures,
    ))
}

fn find_attr<'a>(item: &'a syn::Item, name: &str) -> Option<&'a syn::Attribute> {
    item_attrs(item)?.iter().find(|attr| attr.path().is_ident(name))
}

fn item_attrs(item: &syn::Item) -> Option<&Vec<syn::Attribute>> {
    match item {
        syn::Item::Struct(item) => Some(&item.attrs),
        syn::Item::Enum(item) => Some(&item.attrs),
        syn::Item::Trait(item) => Some(&item.attrs),
        syn::Item::Type(item) => Some(&item.attrs),
        syn::Item::Union(item) => Some(&item.attrs),
        syn::Item::Fn(item) => Some(&item.attrs),
        syn::Item::Mod(item) => Some(&item.attrs),
        syn::Item::Const(item) => Some(&item.attrs),
        syn::Item::Static(item) => Some(&item.attrs),
        syn::Item::Impl(item) => Some(&item.attrs),
        _ => None,
    }
}

fn item_name(item: &syn::Item) -> String {
    match item {
        syn::Item::Struct(item) => item.ident.to_string(),
        syn::Item::Enum(item) => item.ident.to_string(),
        syn::Item::Trait(item) => item.ident.to_string(),
        syn::Item::Type(item) => item.ident.to_string(),
        syn::Item::Union(item) => item.ident.to_string(),
        _ => String::from("item"),
    }
}

fn scrub_attrs(attrs: &mut Vec<syn::Attribute>) {
    attrs.retain(|attr| {
        !ORMLET_ATTRS
            .iter()
            .any(|name| attr.path().is_ident(name))
    });
}

/// Removes generator attributes from an item so the re-emitted declaration
/// compiles without the generator's attribute grammar.
fn scrub_item(item: &mut syn::Item) {
    match item {
        syn::Item::Struct(item) => {
            scrub_attrs(&mut item.attrs);
            for field in item.fields.iter_mut() {
                scrub_attrs(&mut field.attrs);
            }
        }
        syn::Item::Trait(item) => {
            scrub_attrs(&mut item.attrs);
            for trait_item in item.items.iter_mut() {
                if let syn::TraitItem::Fn(method) = trait_item {
                    scrub_attrs(&mut method.attrs);
                }
            }
        }
        syn::Item::Enum(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Type(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Union(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Fn(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Mod(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Const(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Static(item) => scrub_attrs(&mut item.attrs),
        syn::Item::Impl(item) => scrub_attrs(&mut item.attrs),
        _ => {}
    }
}

/// One generated source unit, tagged with the paths it was derived from so
/// the build integration can skip regeneration when none changed.
#[derive(Debug)]
pub struct GeneratedUnit {
    /// Originating entity name
    pub entity: String,

    /// Suggested file name under the output directory
    pub file_name: String,

    /// Formatted source text
    pub source: String,

    /// Regeneration dependencies: the schema file carrying the originating
    /// declaration and the global configuration declaration
    pub dependencies: Vec<PathBuf>,
}

/// The output of one file-driver run: generated units for the entities that
/// resolved, and the failures for those that did not.
#[derive(Debug)]
pub struct GeneratedSet {
    pub units: Vec<GeneratedUnit>,
    pub failures: Vec<(String, Error)>,
}

impl GeneratedSet {
    /// Writes every unit into `dir`, returning the written paths.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for unit in &self.units {
            let path = dir.join(&unit.file_name);
            std::fs::write(&path, &unit.source)?;
            written.push(path);
        }
        Ok(written)
    }

    /// `cargo:rerun-if-changed=` lines for every distinct dependency, for
    /// build-script integration.
    pub fn rerun_directives(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut directives = Vec::new();
        for unit in &self.units {
            for dependency in &unit.dependencies {
                if seen.insert(dependency.clone()) {
                    directives.push(format!("cargo:rerun-if-changed={}", dependency.display()));
                }
            }
        }
        directives
    }

    pub fn emit_rerun_directives(&self) {
        for directive in self.rerun_directives() {
            println!("{directive}");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] Error),
}

/// File-driver frontend: reads a schema module from disk and produces one
/// generated source unit per resolved entity.
#[derive(Debug, Default)]
pub struct Generator {
    _private: (),
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_file(&self, schema: &Path) -> Result<GeneratedSet, DriverError> {
        let source = std::fs::read_to_string(schema)?;
        let file = syn::parse_file(&source).map_err(Error::Parse)?;
        self.generate_items(file.items, schema)
    }

    /// Generates from an already-parsed item list; dependencies are tagged
    /// with `schema` as if the items were read from that path.
    pub fn generate_source(
        &self,
        source: &str,
        schema: &Path,
    ) -> Result<GeneratedSet, DriverError> {
        let file = syn::parse_file(source).map_err(Error::Parse)?;
        self.generate_items(file.items, schema)
    }

    fn generate_items(
        &self,
        items: Vec<syn::Item>,
        schema: &Path,
    ) -> Result<GeneratedSet, DriverError> {
        let (run, mut failures) = run_items(items)?;

        let mut units = Vec::new();
        for table in run.resolution.tables.values() {
            let tokens = match expand::entity(table, &run.resolution, &run.config) {
                Ok(tokens) => tokens,
                Err(err) => {
                    failures.push((table.ident.to_string(), err));
                    continue;
                }
            };

            // Generated units live as sibling submodules of the schema
            // module, so the schema's declarations are one `super` away.
            let unit_file: syn::File = syn::parse2(quote! {
                use super::*;

                #tokens
            })
            .map_err(Error::Parse)?;

            let entity = table.ident.to_string();
            let source = format!(
                "// @generated by ormlet from {}. Do not edit.\n\n{}",
                schema.display(),
                prettyplease::unparse(&unit_file)
            );

            units.push(GeneratedUnit {
                file_name: format!("{}.rs", entity.to_snake_case()),
                entity,
                source,
                dependencies: vec![schema.to_path_buf()],
            });
        }

        Ok(GeneratedSet { units, failures })
    }
}
