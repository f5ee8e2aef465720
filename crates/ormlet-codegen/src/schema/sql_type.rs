use proc_macro2::TokenStream;
use quote::quote;
use syn::parenthesized;

mod kw {
    syn::custom_keyword!(boolean);
    syn::custom_keyword!(smallint);
    syn::custom_keyword!(int);
    syn::custom_keyword!(bigint);
    syn::custom_keyword!(float);
    syn::custom_keyword!(double);
    syn::custom_keyword!(text);
    syn::custom_keyword!(varchar);
    syn::custom_keyword!(binary);
    syn::custom_keyword!(blob);
    syn::custom_keyword!(timestamp);
    syn::custom_keyword!(date);
    syn::custom_keyword!(time);
    syn::custom_keyword!(datetime);
    syn::custom_keyword!(uuid);
}

/// A storage-type descriptor as it appears in the generated column
/// initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SqlTypeExpr {
    Boolean,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    VarChar(u32),
    Binary(u32),
    Blob,
    Timestamp,
    Date,
    Time,
    DateTime,
    Uuid,
    Custom(String),
}

impl syn::parse::Parse for SqlTypeExpr {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        fn sized(input: syn::parse::ParseStream) -> syn::Result<u32> {
            let content;
            parenthesized!(content in input);
            let lit: syn::LitInt = content.parse()?;
            lit.base10_parse()
        }

        let lookahead = input.lookahead1();
        if lookahead.peek(syn::LitStr) {
            let lit: syn::LitStr = input.parse()?;
            Ok(Self::Custom(lit.value()))
        } else if lookahead.peek(kw::boolean) {
            let _kw: kw::boolean = input.parse()?;
            Ok(Self::Boolean)
        } else if lookahead.peek(kw::smallint) {
            let _kw: kw::smallint = input.parse()?;
            Ok(Self::SmallInt)
        } else if lookahead.peek(kw::int) {
            let _kw: kw::int = input.parse()?;
            Ok(Self::Int)
        } else if lookahead.peek(kw::bigint) {
            let _kw: kw::bigint = input.parse()?;
            Ok(Self::BigInt)
        } else if lookahead.peek(kw::float) {
            let _kw: kw::float = input.parse()?;
            Ok(Self::Float)
        } else if lookahead.peek(kw::double) {
            let _kw: kw::double = input.parse()?;
            Ok(Self::Double)
        } else if lookahead.peek(kw::text) {
            let _kw: kw::text = input.parse()?;
            Ok(Self::Text)
        } else if lookahead.peek(kw::varchar) {
            let _kw: kw::varchar = input.parse()?;
            Ok(Self::VarChar(sized(input)?))
        } else if lookahead.peek(kw::binary) {
            let _kw: kw::binary = input.parse()?;
            Ok(Self::Binary(sized(input)?))
        } else if lookahead.peek(kw::blob) {
            let _kw: kw::blob = input.parse()?;
            Ok(Self::Blob)
        } else if lookahead.peek(kw::timestamp) {
            let _kw: kw::timestamp = input.parse()?;
            Ok(Self::Timestamp)
        } else if lookahead.peek(kw::date) {
            let _kw: kw::date = input.parse()?;
            Ok(Self::Date)
        } else if lookahead.peek(kw::time) {
            let _kw: kw::time = input.parse()?;
            Ok(Self::Time)
        } else if lookahead.peek(kw::datetime) {
            let _kw: kw::datetime = input.parse()?;
            Ok(Self::DateTime)
        } else if lookahead.peek(kw::uuid) {
            let _kw: kw::uuid = input.parse()?;
            Ok(Self::Uuid)
        } else {
            Err(lookahead.error())
        }
    }
}

impl quote::ToTokens for SqlTypeExpr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Boolean => quote! { ormlet::SqlType::Boolean },
            Self::SmallInt => quote! { ormlet::SqlType::SmallInt },
            Self::Int => quote! { ormlet::SqlType::Int },
            Self::BigInt => quote! { ormlet::SqlType::BigInt },
            Self::Float => quote! { ormlet::SqlType::Float },
            Self::Double => quote! { ormlet::SqlType::Double },
            Self::Text => quote! { ormlet::SqlType::Text },
            Self::VarChar(size) => quote! { ormlet::SqlType::VarChar(#size) },
            Self::Binary(size) => quote! { ormlet::SqlType::Binary(#size) },
            Self::Blob => quote! { ormlet::SqlType::Blob },
            Self::Timestamp => quote! { ormlet::SqlType::Timestamp },
            Self::Date => quote! { ormlet::SqlType::Date },
            Self::Time => quote! { ormlet::SqlType::Time },
            Self::DateTime => quote! { ormlet::SqlType::DateTime },
            Self::Uuid => quote! { ormlet::SqlType::Uuid },
            Self::Custom(name) => quote! { ormlet::SqlType::Custom(#name.to_string()) },
        }
        .to_tokens(tokens);
    }
}

impl SqlTypeExpr {
    /// The fixed table of builtin primitive/temporal/UUID/byte-sequence
    /// mappings, consulted after converters.
    pub(crate) fn builtin(ty: &syn::Type) -> Option<SqlTypeExpr> {
        let syn::Type::Path(path) = ty else {
            return None;
        };
        let last = path.path.segments.last()?;

        if last.ident == "Vec" {
            // Only Vec<u8> maps; any other element type is unresolved.
            let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
                return None;
            };
            let mut iter = args.args.iter();
            let (Some(syn::GenericArgument::Type(syn::Type::Path(elem))), None) =
                (iter.next(), iter.next())
            else {
                return None;
            };
            return elem.path.is_ident("u8").then_some(SqlTypeExpr::Blob);
        }

        if !last.arguments.is_none() {
            return None;
        }

        match last.ident.to_string().as_str() {
            "bool" => Some(SqlTypeExpr::Boolean),
            "i16" => Some(SqlTypeExpr::SmallInt),
            "i32" => Some(SqlTypeExpr::Int),
            "i64" => Some(SqlTypeExpr::BigInt),
            "f32" => Some(SqlTypeExpr::Float),
            "f64" => Some(SqlTypeExpr::Double),
            "String" => Some(SqlTypeExpr::Text),
            "Uuid" => Some(SqlTypeExpr::Uuid),
            "Timestamp" => Some(SqlTypeExpr::Timestamp),
            "Date" => Some(SqlTypeExpr::Date),
            "Time" => Some(SqlTypeExpr::Time),
            "DateTime" => Some(SqlTypeExpr::DateTime),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    #[test]
    fn builtin_table() {
        assert_eq!(
            SqlTypeExpr::builtin(&parse_quote!(i64)),
            Some(SqlTypeExpr::BigInt)
        );
        assert_eq!(
            SqlTypeExpr::builtin(&parse_quote!(String)),
            Some(SqlTypeExpr::Text)
        );
        assert_eq!(
            SqlTypeExpr::builtin(&parse_quote!(Vec<u8>)),
            Some(SqlTypeExpr::Blob)
        );
        assert_eq!(
            SqlTypeExpr::builtin(&parse_quote!(uuid::Uuid)),
            Some(SqlTypeExpr::Uuid)
        );
        assert_eq!(
            SqlTypeExpr::builtin(&parse_quote!(jiff::Timestamp)),
            Some(SqlTypeExpr::Timestamp)
        );
        assert_eq!(SqlTypeExpr::builtin(&parse_quote!(Vec<String>)), None);
        assert_eq!(SqlTypeExpr::builtin(&parse_quote!(Money)), None);
    }

    #[test]
    fn parse_sized_types() {
        let ty: SqlTypeExpr = parse_quote!(varchar(64));
        assert_eq!(ty, SqlTypeExpr::VarChar(64));

        let ty: SqlTypeExpr = parse_quote!("money_type");
        assert_eq!(ty, SqlTypeExpr::Custom("money_type".to_owned()));
    }
}
