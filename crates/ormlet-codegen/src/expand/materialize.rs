use proc_macro2::TokenStream;
use quote::quote;

use super::Expand;
use crate::schema::{DefaultExpr, Error};

impl Expand<'_> {
    /// Row materialization for record entities: one struct literal field per
    /// declared field, reading mapped columns through the generated
    /// accessors and leaving unmapped fields to their defaults.
    pub(super) fn expand_from_row(&self) -> Result<TokenStream, Error> {
        let entity_ident = &self.table.ident;
        let table_ident = &self.table.table_ident;
        let vis = &self.table.vis;

        let mut fields = Vec::new();

        for column in &self.table.columns {
            let property = &column.property;
            let (_, converter) = self.column_storage(column)?;

            let init = match (converter, column.nullable) {
                // Nullable columns may legitimately read back as absent.
                (None, true) => quote! {
                    row.opt(self.#property.name())?
                },
                // The non-null assertion: a missing value is an error.
                (None, false) => quote! {
                    row.typed(self.#property.name())?
                },
                (Some(converter), true) => quote! {
                    match row.value(self.#property.name()) {
                        None | Some(ormlet::Value::Null) => None,
                        Some(value) => {
                            Some(ormlet::Convert::from_value(&#converter, value.clone())?)
                        }
                    }
                },
                (Some(converter), false) => quote! {
                    ormlet::Convert::from_value(
                        &#converter,
                        row.require(self.#property.name())?.clone(),
                    )?
                },
            };

            fields.push(quote!(#property: #init));
        }

        for field in &self.table.unmapped {
            let property = &field.property;
            let init = if field.phantom {
                quote!(std::marker::PhantomData)
            } else {
                match &field.default_expr {
                    Some(DefaultExpr::Trait) | None => quote!(Default::default()),
                    Some(DefaultExpr::Expr(expr)) => quote!(#expr),
                }
            };
            fields.push(quote!(#property: #init));
        }

        Ok(quote! {
            impl #table_ident {
                /// Materializes one entity from a result row.
                #vis fn from_row(&self, row: &ormlet::Row) -> ormlet::Result<#entity_ident> {
                    Ok(#entity_ident {
                        #(#fields,)*
                    })
                }
            }
        })
    }
}
