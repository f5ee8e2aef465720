use proc_macro2::Span;
use syn::spanned::Spanned;

use super::{ColumnAttr, Error, ErrorSet, Name};

/// One property of an entity declaration: a named struct field on record
/// entities, a required getter method on proxy entities.
#[derive(Debug)]
pub(crate) struct Field {
    /// Property name
    pub(crate) name: Name,

    /// Declared value type, including any `Option` wrapper
    pub(crate) ty: syn::Type,

    /// Value type with the `Option` wrapper stripped
    pub(crate) value_ty: syn::Type,

    /// True when the declared type is `Option<_>`
    pub(crate) nullable: bool,

    /// True for `PhantomData` fields, which have no backing storage
    pub(crate) phantom: bool,

    /// Property attributes
    pub(crate) attrs: FieldAttr,

    pub(crate) span: Span,
}

#[derive(Debug, Default)]
pub(crate) struct FieldAttr {
    /// True if annotated with `#[key]`
    pub(crate) key: bool,

    /// True if annotated with `#[auto]`: an unset value is generated by the
    /// executor on insert and assigned back
    pub(crate) auto: bool,

    /// Reference target entity from `#[references(Target)]`
    pub(crate) references: Option<syn::Path>,

    /// Optional storage column name, type, converter, mutability
    pub(crate) column: Option<ColumnAttr>,

    /// Constructor default from `#[default]` / `#[default(<expr>)]`
    pub(crate) default_expr: Option<DefaultExpr>,

    /// True if annotated with `#[ignore]`
    pub(crate) ignored: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum DefaultExpr {
    /// `#[default]`: the type's `Default` impl
    Trait,
    /// `#[default(<expr>)]`
    Expr(syn::Expr),
}

impl Field {
    pub(super) fn from_struct_field(field: &syn::Field) -> Result<Self, Error> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "entity fields must be named").into());
        };

        let attrs = FieldAttr::from_ast(&field.attrs, &ident.to_string(), field.span())?;

        Ok(Self::new(
            Name::from_ident(ident),
            field.ty.clone(),
            attrs,
            field.span(),
        ))
    }

    /// Builds a property from a proxy getter. The caller has already
    /// filtered out computed-only methods (those with a default body).
    pub(super) fn from_trait_method(method: &syn::TraitItemFn) -> Result<Self, Error> {
        let signature = &method.sig;

        let takes_self_ref = matches!(
            signature.receiver(),
            Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none()
        );
        if !takes_self_ref || signature.inputs.len() != 1 {
            return Err(syn::Error::new_spanned(
                signature,
                "proxy entity properties must be getters taking `&self` and nothing else",
            )
            .into());
        }

        let syn::ReturnType::Type(_, ty) = &signature.output else {
            return Err(syn::Error::new_spanned(
                signature,
                "proxy entity properties must declare a return type",
            )
            .into());
        };

        let ident = &signature.ident;
        let attrs = FieldAttr::from_ast(&method.attrs, &ident.to_string(), method.span())?;

        Ok(Self::new(
            Name::from_ident(ident),
            (**ty).clone(),
            attrs,
            method.span(),
        ))
    }

    fn new(name: Name, ty: syn::Type, attrs: FieldAttr, span: Span) -> Self {
        let (value_ty, nullable) = match option_inner(&ty) {
            Some(inner) => (inner.clone(), true),
            None => (ty.clone(), false),
        };
        let phantom = is_phantom(&value_ty);

        Self {
            name,
            ty,
            value_ty,
            nullable,
            phantom,
            attrs,
            span,
        }
    }

    /// True when the property maps to a storage column.
    pub(crate) fn eligible(&self, ignore_set: &[syn::Ident]) -> bool {
        !self.attrs.ignored
            && !self.phantom
            && !ignore_set.iter().any(|ident| *ident == self.name.ident)
    }
}

impl FieldAttr {
    fn from_ast(attrs: &[syn::Attribute], property: &str, span: Span) -> Result<Self, Error> {
        let mut errs = ErrorSet::new();
        let mut result = FieldAttr::default();

        for attr in attrs {
            if attr.path().is_ident("key") {
                if result.key {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[key] attribute"));
                } else {
                    result.key = true;
                }
            } else if attr.path().is_ident("auto") {
                if result.auto {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[auto] attribute"));
                } else {
                    result.auto = true;
                }
            } else if attr.path().is_ident("references") {
                if result.references.is_some() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "duplicate #[references] attribute",
                    ));
                } else {
                    result.references = Some(attr.parse_args()?);
                }
            } else if attr.path().is_ident("column") {
                if result.column.is_some() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "duplicate #[column] attribute",
                    ));
                } else {
                    result.column = Some(ColumnAttr::from_ast(attr)?);
                }
            } else if attr.path().is_ident("default") {
                if result.default_expr.is_some() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "duplicate #[default] attribute",
                    ));
                } else {
                    result.default_expr = Some(match &attr.meta {
                        syn::Meta::Path(_) => DefaultExpr::Trait,
                        _ => DefaultExpr::Expr(attr.parse_args()?),
                    });
                }
            } else if attr.path().is_ident("ignore") {
                if result.ignored {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "duplicate #[ignore] attribute",
                    ));
                } else {
                    result.ignored = true;
                }
            }
        }

        // A reference resolves its storage from the target's primary key; an
        // explicit storage type or converter cannot also apply.
        if result.references.is_some() {
            let conflicting = result
                .column
                .as_ref()
                .is_some_and(|column| column.sql.is_some() || column.with.is_some());
            if conflicting {
                errs.push(Error::ConflictingTypeOverride {
                    property: property.to_owned(),
                    span,
                });
            }
        }

        if result.ignored && result.key {
            errs.push(syn::Error::new(
                span,
                "an ignored field cannot be a primary key",
            ));
        }

        errs.collect()?;
        Ok(result)
    }
}

fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let mut iter = args.args.iter();
    match (iter.next(), iter.next()) {
        (Some(syn::GenericArgument::Type(inner)), None) => Some(inner),
        _ => None,
    }
}

fn is_phantom(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "PhantomData")
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field(tokens: syn::Field) -> Field {
        Field::from_struct_field(&tokens).unwrap()
    }

    #[test]
    fn nullability_follows_option() {
        let plain = field(parse_quote!(name: String));
        assert!(!plain.nullable);

        let nullable = field(parse_quote!(nickname: Option<String>));
        assert!(nullable.nullable);
        assert_eq!(nullable.value_ty, parse_quote!(String));
    }

    #[test]
    fn phantom_fields_have_no_backing_storage() {
        let phantom = field(parse_quote!(marker: std::marker::PhantomData<u8>));
        assert!(phantom.phantom);
        assert!(!phantom.eligible(&[]));
    }

    #[test]
    fn reference_with_type_override_conflicts() {
        let result = Field::from_struct_field(&parse_quote!(
            #[references(Author)]
            #[column(sql = bigint)]
            author_id: i64
        ));
        assert!(matches!(
            result,
            Err(Error::ConflictingTypeOverride { .. })
        ));
    }

    #[test]
    fn ignore_set_excludes_by_name() {
        let f = field(parse_quote!(cached: String));
        let ignored: Vec<syn::Ident> = vec![parse_quote!(cached)];
        assert!(!f.eligible(&ignored));
        assert!(f.eligible(&[]));
    }
}
