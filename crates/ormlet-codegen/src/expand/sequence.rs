use proc_macro2::TokenStream;
use quote::quote;

use super::Expand;

impl Expand<'_> {
    /// The collection accessor: the default queryable sequence bound to this
    /// table.
    pub(super) fn expand_sequence_accessor(&self) -> TokenStream {
        let vis = &self.table.vis;
        let table_ident = &self.table.table_ident;
        let accessor_ident = &self.table.accessor_ident;
        let doc = format!(
            "The default collection of [`{}`] entities.",
            self.table.ident
        );

        quote! {
            #[doc = #doc]
            #vis fn #accessor_ident(db: &ormlet::Database) -> ormlet::EntitySequence<#table_ident> {
                db.sequence_of::<#table_ident>()
            }
        }
    }
}
