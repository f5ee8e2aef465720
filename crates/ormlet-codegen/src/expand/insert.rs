use proc_macro2::TokenStream;
use quote::quote;

use super::{util, Expand};

impl Expand<'_> {
    /// The insert helper: an ordered assignment list from non-null bound
    /// values, with generated-key read-back for a single nullable, mutable
    /// `#[auto]` primary key.
    pub(super) fn expand_add_method(&self) -> TokenStream {
        let entity_ident = &self.table.ident;
        let table = util::ident("table");
        let assignments = util::ident("assignments");
        let result = util::ident("result");

        let pushes = self
            .table
            .columns
            .iter()
            .filter(|column| column.mutable)
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

        let (generated_key, read_back) = match self.table.generated_key() {
            Some(key) => {
                let property = &key.property;
                (
                    quote!(Some(#table.#property.name())),
                    quote! {
                        if let Some(key) = #result.generated_key {
                            #table.#property.write(entity, key)?;
                        }
                    },
                )
            }
            None => (quote!(None), quote!()),
        };

        quote! {
            fn add(&self, entity: &mut #entity_ident) -> ormlet::Result<u64> {
                self.check_unmodified("add")?;
                let #table = self.table();
                let mut #assignments = Vec::new();
                #(#pushes)*
                let #result = ormlet::Executor::insert(
                    self.executor(),
                    ormlet::Table::descriptor(#table),
                    &#assignments,
                    #generated_key,
                )?;
                #read_back
                Ok(#result.rows_affected)
            }
        }
    }
}
