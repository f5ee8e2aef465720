use proc_macro2::Span;
use syn::parse::Parse;
use syn::spanned::Spanned;

use super::{Error, ErrorSet, Field, NamingSpec};

/// The structural kind of an entity declaration. The kinds require different
/// emission strategies and the kind never changes after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityKind {
    /// Struct entity owning its own storage
    Record,

    /// Trait entity backed by a generic property map
    Proxy,
}

mod kw {
    syn::custom_keyword!(alias);
    syn::custom_keyword!(catalog);
    syn::custom_keyword!(schema);
    syn::custom_keyword!(naming);
    syn::custom_keyword!(accessor);
    syn::custom_keyword!(ignore);
}

/// Parsed `#[table(..)]` attribute.
#[derive(Debug, Default)]
pub(crate) struct TableAttr {
    /// Explicit storage table name
    pub(crate) name: Option<syn::LitStr>,

    pub(crate) alias: Option<syn::LitStr>,
    pub(crate) catalog: Option<syn::LitStr>,
    pub(crate) schema: Option<syn::LitStr>,

    /// Table-local naming strategy
    pub(crate) naming: Option<NamingSpec>,

    /// Override for the generated collection accessor name
    pub(crate) accessor: Option<syn::Ident>,

    /// Properties excluded from mapping
    pub(crate) ignore: Vec<syn::Ident>,
}

impl TableAttr {
    fn from_ast(attr: &syn::Attribute) -> syn::Result<TableAttr> {
        attr.parse_args()
    }
}

impl syn::parse::Parse for TableAttr {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = TableAttr::default();

        loop {
            let lookahead = input.lookahead1();

            if lookahead.peek(syn::LitStr) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate table name"));
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::alias) {
                let _kw: kw::alias = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.alias = Some(input.parse()?);
            } else if lookahead.peek(kw::catalog) {
                let _kw: kw::catalog = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.catalog = Some(input.parse()?);
            } else if lookahead.peek(kw::schema) {
                let _kw: kw::schema = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.schema = Some(input.parse()?);
            } else if lookahead.peek(kw::naming) {
                let _kw: kw::naming = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.naming = Some(NamingSpec::from_path(input.parse()?));
            } else if lookahead.peek(kw::accessor) {
                let _kw: kw::accessor = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.accessor = Some(input.parse()?);
            } else if lookahead.peek(kw::ignore) {
                let _kw: kw::ignore = input.parse()?;
                let content;
                syn::parenthesized!(content in input);
                let idents =
                    content.parse_terminated(syn::Ident::parse, syn::Token![,])?;
                result.ignore.extend(idents);
            } else {
                return Err(lookahead.error());
            }

            if input.is_empty() {
                break;
            }
            let _comma: syn::Token![,] = input.parse()?;
        }

        Ok(result)
    }
}

/// An unresolved entity declaration with its eligible and ineligible
/// properties in declaration order.
#[derive(Debug)]
pub(crate) struct EntityDecl {
    pub(crate) ident: syn::Ident,
    pub(crate) vis: syn::Visibility,
    pub(crate) kind: EntityKind,
    pub(crate) table_attr: TableAttr,
    pub(crate) fields: Vec<Field>,
    pub(crate) span: Span,
}

impl EntityDecl {
    pub(crate) fn from_item(item: &syn::Item) -> Result<EntityDecl, Error> {
        match item {
            syn::Item::Struct(item) => Self::from_struct(item),
            syn::Item::Trait(item) => Self::from_trait(item),
            other => Err(Error::InvalidDeclarationKind { span: other.span() }),
        }
    }

    fn from_struct(item: &syn::ItemStruct) -> Result<EntityDecl, Error> {
        let syn::Fields::Named(fields) = &item.fields else {
            return Err(syn::Error::new_spanned(&item.fields, "entity fields must be named").into());
        };

        if !item.generics.params.is_empty() {
            return Err(
                syn::Error::new_spanned(&item.generics, "entity generics are not supported").into(),
            );
        }

        let table_attr = table_attr(&item.attrs)?;

        let mut errs = ErrorSet::new();
        let mut parsed = vec![];
        for field in fields.named.iter() {
            match Field::from_struct_field(field) {
                Ok(field) => parsed.push(field),
                Err(err) => errs.push(err),
            }
        }
        errs.collect()?;

        Ok(EntityDecl {
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            kind: EntityKind::Record,
            table_attr,
            fields: parsed,
            span: item.span(),
        })
    }

    fn from_trait(item: &syn::ItemTrait) -> Result<EntityDecl, Error> {
        // Proxy declarations must extend the entity capability marker.
        let has_marker = item.supertraits.iter().any(|supertrait| match supertrait {
            syn::TypeParamBound::Trait(bound) => bound
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Entity"),
            _ => false,
        });
        if !has_marker {
            return Err(Error::MissingCapabilityMarker {
                entity: item.ident.to_string(),
                span: item.span(),
            });
        }

        if !item.generics.params.is_empty() {
            return Err(
                syn::Error::new_spanned(&item.generics, "entity generics are not supported").into(),
            );
        }

        let table_attr = table_attr(&item.attrs)?;

        let mut errs = ErrorSet::new();
        let mut parsed = vec![];
        for trait_item in &item.items {
            let syn::TraitItem::Fn(method) = trait_item else {
                continue;
            };
            // Methods with a default body are computed-only properties with
            // no backing storage.
            if method.default.is_some() {
                continue;
            }
            match Field::from_trait_method(method) {
                Ok(field) => parsed.push(field),
                Err(err) => errs.push(err),
            }
        }
        errs.collect()?;

        Ok(EntityDecl {
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            kind: EntityKind::Proxy,
            table_attr,
            fields: parsed,
            span: item.span(),
        })
    }
}

fn table_attr(attrs: &[syn::Attribute]) -> Result<TableAttr, Error> {
    let mut result = None;
    for attr in attrs {
        if attr.path().is_ident("table") {
            if result.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[table] attribute").into());
            }
            result = Some(TableAttr::from_ast(attr)?);
        }
    }
    Ok(result.unwrap_or_default())
}
