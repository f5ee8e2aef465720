use proc_macro2::TokenStream;
use quote::quote;

use super::{util, Expand};
use crate::schema::Error;

impl Expand<'_> {
    /// The update helper: assignments from non-null, non-key bound values,
    /// with an equality condition conjoined over every primary key column.
    pub(super) fn expand_update_method(&self) -> Result<TokenStream, Error> {
        let entity_ident = &self.table.ident;
        let table = util::ident("table");
        let assignments = util::ident("assignments");
        let condition = util::ident("condition");

        let keys = self.table.primary_keys();
        if keys.is_empty() {
            // Resolution already rejects this; kept as a guard for direct
            // emission paths.
            return Err(Error::MissingUpdateKey {
                entity: self.table.ident.to_string(),
                span: self.table.span,
            });
        }

        let pushes = self
            .table
            .columns
            .iter()
            .filter(|column| column.mutable && !column.primary_key)
            .map(|column| {
                let property = &column.property;
                quote! {
                    {
                        let value = #table.#property.read(entity);
                        if !value.is_null() {
                            #assignments.push(ormlet::Assignment::new(
                                #table.#property.name(),
                                value,
                            ));
                        }
                    }
                }
            });

        let mut condition_init = {
            let property = &keys[0].property;
            quote!(#table.#property.eq(#table.#property.read(entity)))
        };
        for key in &keys[1..] {
            let property = &key.property;
            condition_init = quote! {
                #condition_init.and(#table.#property.eq(#table.#property.read(entity)))
            };
        }

        Ok(quote! {
            fn update(&self, entity: &#entity_ident) -> ormlet::Result<u64> {
                self.check_unmodified("update")?;
                let #table = self.table();
                let mut #assignments = Vec::new();
                #(#pushes)*
                let #condition = #condition_init;
                ormlet::Executor::update(
                    self.executor(),
                    ormlet::Table::descriptor(#table),
                    &#assignments,
                    &#condition,
                )
            }
        })
    }
}
