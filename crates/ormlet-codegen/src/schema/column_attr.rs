use super::SqlTypeExpr;

mod kw {
    syn::custom_keyword!(sql);
    syn::custom_keyword!(with);
    syn::custom_keyword!(readonly);
}

/// Parsed `#[column(..)]` attribute.
#[derive(Debug, Default)]
pub(crate) struct ColumnAttr {
    /// Explicit storage column name
    pub(crate) name: Option<syn::LitStr>,

    /// Explicit storage type
    pub(crate) sql: Option<SqlTypeExpr>,

    /// Converter override
    pub(crate) with: Option<syn::Path>,

    /// Excluded from insert/update assignment lists
    pub(crate) readonly: bool,
}

impl ColumnAttr {
    pub(crate) fn from_ast(attr: &syn::Attribute) -> syn::Result<ColumnAttr> {
        attr.parse_args()
    }
}

impl syn::parse::Parse for ColumnAttr {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = ColumnAttr::default();

        // Comma separated arguments, each at most once:
        //
        // #[column("name")]
        // #[column(sql = varchar(32))]
        // #[column(with = MoneyConverter)]
        // #[column("name", sql = "money_type", readonly)]
        loop {
            let lookahead = input.lookahead1();

            if lookahead.peek(syn::LitStr) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column name"));
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::sql) {
                if result.sql.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column storage type"));
                }
                let _kw: kw::sql = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.sql = Some(input.parse()?);
            } else if lookahead.peek(kw::with) {
                if result.with.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column converter"));
                }
                let _kw: kw::with = input.parse()?;
                let _eq: syn::Token![=] = input.parse()?;
                result.with = Some(input.parse()?);
            } else if lookahead.peek(kw::readonly) {
                if result.readonly {
                    return Err(syn::Error::new(input.span(), "duplicate `readonly`"));
                }
                let _kw: kw::readonly = input.parse()?;
                result.readonly = true;
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

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn parses_combined_arguments() {
        let attr: syn::Attribute = parse_quote!(#[column("pen_name", sql = varchar(32), readonly)]);
        let column = ColumnAttr::from_ast(&attr).unwrap();

        assert_eq!(column.name.unwrap().value(), "pen_name");
        assert_eq!(column.sql, Some(SqlTypeExpr::VarChar(32)));
        assert!(column.readonly);
        assert!(column.with.is_none());
    }

    #[test]
    fn rejects_duplicate_name() {
        let attr: syn::Attribute = parse_quote!(#[column("a", "b")]);
        assert!(ColumnAttr::from_ast(&attr).is_err());
    }
}
