mod insert;
mod materialize;
mod proxy;
mod sequence;
mod table;
mod update;
mod util;

use proc_macro2::TokenStream;
use quote::quote;

use crate::schema::{
    ColumnMeta, Config, EntityKind, Error, Resolution, SqlTypeExpr, StorageForm, TableMeta,
};

/// Emission context for one resolved entity.
pub(crate) struct Expand<'a> {
    /// The table being expanded
    table: &'a TableMeta,

    /// Every resolved table, for reference target lookups
    resolution: &'a Resolution,

    /// Global configuration driving the emission strategy toggles
    config: &'a Config,
}

/// Emits every enabled artifact for one resolved entity.
pub(crate) fn entity(
    table: &TableMeta,
    resolution: &Resolution,
    config: &Config,
) -> Result<TokenStream, Error> {
    Expand {
        table,
        resolution,
        config,
    }
    .expand()
}

impl Expand<'_> {
    fn expand(&self) -> Result<TokenStream, Error> {
        let descriptor = self.expand_table_descriptor()?;

        let kind_specific = match self.table.kind {
            EntityKind::Record => self.expand_from_row()?,
            EntityKind::Proxy => self.expand_proxy()?,
        };

        let accessor = self
            .config
            .sequence_accessors
            .then(|| self.expand_sequence_accessor());

        let helpers = if self.table.kind == EntityKind::Record
            && (self.config.insert_helpers || self.config.update_helpers)
        {
            Some(self.expand_sequence_ext()?)
        } else {
            None
        };

        Ok(quote! {
            #descriptor
            #kind_specific
            #accessor
            #helpers
        })
    }

    /// The type the table's columns bind against: the record struct itself,
    /// or the generated proxy.
    fn entity_ty(&self) -> &syn::Ident {
        match self.table.kind {
            EntityKind::Record => &self.table.ident,
            EntityKind::Proxy => &self.table.proxy_ident,
        }
    }

    /// The storage type and converter a column reads and writes through; for
    /// reference columns both come from the target's primary key.
    fn column_storage(
        &self,
        column: &ColumnMeta,
    ) -> Result<(SqlTypeExpr, Option<syn::Ident>), Error> {
        match (&column.storage, &column.reference) {
            (StorageForm::Reference, Some(target)) => self
                .resolution
                .reference_storage(&column.property, target),
            (StorageForm::Builtin(sql), _) => Ok((sql.clone(), None)),
            (StorageForm::Converted { converter, sql }, _) => {
                Ok((sql.clone(), Some(converter.clone())))
            }
            (StorageForm::Reference, None) => Err(Error::UnknownEntity {
                property: column.property.to_string(),
                target: String::new(),
                span: column.span,
            }),
        }
    }

    fn expand_sequence_ext(&self) -> Result<TokenStream, Error> {
        let vis = &self.table.vis;
        let entity_ident = &self.table.ident;
        let table_ident = &self.table.table_ident;
        let ext_ident = &self.table.sequence_ext_ident;

        let mut decls = Vec::new();
        let mut methods = Vec::new();

        if self.config.insert_helpers {
            decls.push(quote! {
                fn add(&self, entity: &mut #entity_ident) -> ormlet::Result<u64>;
            });
            methods.push(self.expand_add_method());
        }
        if self.config.update_helpers {
            decls.push(quote! {
                fn update(&self, entity: &#entity_ident) -> ormlet::Result<u64>;
            });
            methods.push(self.expand_update_method()?);
        }

        Ok(quote! {
            #vis trait #ext_ident {
                #(#decls)*
            }

            impl #ext_ident for ormlet::EntitySequence<#table_ident> {
                #(#methods)*
            }
        })
    }
}
