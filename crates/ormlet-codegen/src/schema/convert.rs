use quote::ToTokens;
use syn::spanned::Spanned;

use super::{Error, SqlTypeExpr};

mod kw {
    syn::custom_keyword!(factory);
    syn::custom_keyword!(sql);
}

/// The closed set of converter shapes, dispatched once during type mapping.
#[derive(Debug)]
pub(crate) enum ConverterShape {
    /// Converts exactly one value type
    Fixed(syn::Type),

    /// Converts a closed set of value types
    Generic(Vec<syn::Type>),

    /// Specialized per requesting property type; only reachable as the
    /// configured default enum converter
    Factory,
}

/// A converter declaration: a fieldless unit struct annotated with
/// `#[converter(..)]`.
#[derive(Debug)]
pub(crate) struct ConverterDef {
    pub(crate) ident: syn::Ident,
    pub(crate) shape: ConverterShape,
    pub(crate) sql: SqlTypeExpr,
}

struct ConverterArgs {
    types: Vec<syn::Type>,
    factory: bool,
    sql: Option<SqlTypeExpr>,
}

impl syn::parse::Parse for ConverterArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut args = ConverterArgs {
            types: vec![],
            factory: false,
            sql: None,
        };

        loop {
            if input.peek(kw::factory) {
                let _kw: kw::factory = input.parse()?;
                args.factory = true;
            } else if input.peek(kw::sql) {
                let _kw: kw::sql = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                args.sql = Some(input.parse()?);
            } else {
                args.types.push(input.parse()?);
            }

            if input.is_empty() {
                break;
            }
            let _comma: syn::Token![,] = input.parse()?;
        }

        Ok(args)
    }
}

impl ConverterDef {
    pub(crate) fn from_ast(item: &syn::ItemStruct, attr: &syn::Attribute) -> Result<Self, Error> {
        // Converters are singleton-like: stateless, no per-instance
        // configuration. Anything with fields fails.
        if !matches!(item.fields, syn::Fields::Unit) {
            return Err(Error::ConverterNotSingleton {
                converter: item.ident.to_string(),
                span: item.span(),
            });
        }

        let args: ConverterArgs = attr.parse_args()?;

        let shape = match (args.factory, args.types.len()) {
            (true, 0) => ConverterShape::Factory,
            (true, _) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "a factory converter cannot also list value types",
                )
                .into());
            }
            (false, 0) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected `factory` or at least one value type",
                )
                .into());
            }
            (false, 1) => ConverterShape::Fixed(args.types.into_iter().next().unwrap()),
            (false, _) => ConverterShape::Generic(args.types),
        };

        let Some(sql) = args.sql else {
            return Err(syn::Error::new_spanned(attr, "expected `sql = <storage type>`").into());
        };

        Ok(Self {
            ident: item.ident.clone(),
            shape,
            sql,
        })
    }

    /// True when this converter covers `ty` by its declared shape.
    pub(crate) fn accepts(&self, ty: &syn::Type) -> bool {
        match &self.shape {
            ConverterShape::Fixed(accepted) => same_type(accepted, ty),
            ConverterShape::Generic(accepted) => {
                accepted.iter().any(|accepted| same_type(accepted, ty))
            }
            ConverterShape::Factory => false,
        }
    }
}

pub(crate) fn same_type(a: &syn::Type, b: &syn::Type) -> bool {
    a.to_token_stream().to_string() == b.to_token_stream().to_string()
}

/// Converters declared in the schema module. Type-based lookup consults only
/// the converters registered in configuration, in registration order;
/// explicit per-property overrides may name any declared converter.
#[derive(Debug, Default)]
pub(crate) struct ConverterRegistry {
    declared: Vec<ConverterDef>,
    registered: Vec<syn::Ident>,
    default_enum: Option<syn::Ident>,
}

impl ConverterRegistry {
    pub(crate) fn new(
        declared: Vec<ConverterDef>,
        registered: Vec<syn::Ident>,
        default_enum: Option<syn::Ident>,
    ) -> Self {
        Self {
            declared,
            registered,
            default_enum,
        }
    }

    pub(crate) fn by_ident(&self, ident: &syn::Ident) -> Option<&ConverterDef> {
        self.declared
            .iter()
            .find(|converter| converter.ident == *ident)
    }

    /// The registered converter for the exact non-nullable value type.
    pub(crate) fn for_type(&self, ty: &syn::Type) -> Option<&ConverterDef> {
        self.registered
            .iter()
            .filter_map(|ident| self.by_ident(ident))
            .find(|converter| converter.accepts(ty))
    }

    pub(crate) fn default_enum(&self) -> Option<&ConverterDef> {
        self.default_enum
            .as_ref()
            .and_then(|ident| self.by_ident(ident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn converter(item: syn::ItemStruct) -> Result<ConverterDef, Error> {
        let attr = item
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("converter"))
            .cloned()
            .unwrap();
        ConverterDef::from_ast(&item, &attr)
    }

    #[test]
    fn fixed_shape_accepts_exact_type() {
        let def = converter(parse_quote! {
            #[converter(Money, sql = varchar(64))]
            struct MoneyConverter;
        })
        .unwrap();

        assert!(matches!(def.shape, ConverterShape::Fixed(_)));
        assert!(def.accepts(&parse_quote!(Money)));
        assert!(!def.accepts(&parse_quote!(Currency)));
    }

    #[test]
    fn generic_shape_accepts_each_listed_type() {
        let def = converter(parse_quote! {
            #[converter(Money, Currency, sql = text)]
            struct WideConverter;
        })
        .unwrap();

        assert!(matches!(def.shape, ConverterShape::Generic(_)));
        assert!(def.accepts(&parse_quote!(Money)));
        assert!(def.accepts(&parse_quote!(Currency)));
    }

    #[test]
    fn factory_shape_matches_nothing_directly() {
        let def = converter(parse_quote! {
            #[converter(factory, sql = varchar(32))]
            struct EnumNameConverter;
        })
        .unwrap();

        assert!(matches!(def.shape, ConverterShape::Factory));
        assert!(!def.accepts(&parse_quote!(Role)));
    }

    #[test]
    fn stateful_converter_is_rejected() {
        let result = converter(parse_quote! {
            #[converter(Money, sql = text)]
            struct BadConverter {
                separator: char,
            }
        });

        assert!(matches!(result, Err(Error::ConverterNotSingleton { .. })));
    }
}
