use proc_macro2::TokenStream;
use quote::quote;

use super::Expand;
use crate::schema::{ColumnMeta, EntityKind, Error};

impl Expand<'_> {
    /// The table descriptor type: one `Column` property per resolved column,
    /// constructed with the resolved name, alias, catalog, and schema.
    pub(super) fn expand_table_descriptor(&self) -> Result<TokenStream, Error> {
        let vis = &self.table.vis;
        let table_ident = &self.table.table_ident;
        let entity_ty = self.entity_ty();

        let descriptor = self.expand_descriptor_init();

        let mut fields = Vec::new();
        let mut inits = Vec::new();
        let mut refs = Vec::new();
        for column in &self.table.columns {
            let property = &column.property;
            fields.push(quote! {
                #vis #property: ormlet::Column<#entity_ty>
            });
            inits.push(self.expand_column_init(column)?);
            refs.push(quote!(&self.#property));
        }

        let doc = format!("Table descriptor for [`{}`].", self.table.ident);

        Ok(quote! {
            #[doc = #doc]
            #vis struct #table_ident {
                descriptor: ormlet::TableDescriptor,
                #(#fields,)*
            }

            impl #table_ident {
                #vis fn new() -> Self {
                    Self {
                        descriptor: #descriptor,
                        #(#inits,)*
                    }
                }
            }

            impl Default for #table_ident {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl ormlet::Table for #table_ident {
                type Entity = #entity_ty;

                fn descriptor(&self) -> &ormlet::TableDescriptor {
                    &self.descriptor
                }

                fn columns(&self) -> Vec<&ormlet::Column<#entity_ty>> {
                    vec![#(#refs),*]
                }
            }
        })
    }

    fn expand_descriptor_init(&self) -> TokenStream {
        let name = &self.table.name;
        let mut init = quote!(ormlet::TableDescriptor::new(#name));

        if let Some(alias) = &self.table.alias {
            init = quote!(#init.alias(#alias));
        }
        if let Some(catalog) = &self.table.catalog {
            init = quote!(#init.catalog(#catalog));
        }
        if let Some(schema) = &self.table.schema {
            init = quote!(#init.schema(#schema));
        }

        init
    }

    fn expand_column_init(&self, column: &ColumnMeta) -> Result<TokenStream, Error> {
        let property = &column.property;
        let name = &column.name;
        let (sql, converter) = self.column_storage(column)?;

        let mut init = quote!(ormlet::Column::new(#name, #sql));

        if column.nullable {
            init = quote!(#init.nullable());
        }
        if !column.mutable {
            init = quote!(#init.readonly());
        }
        if column.primary_key {
            init = quote!(#init.primary_key());
        }
        if column.auto {
            init = quote!(#init.auto());
        }

        // Reference columns bind to the target table's primary key.
        if let Some(target) = &column.reference {
            let key = self.resolution.target_key(&column.property, target)?;
            let target_table = &self
                .resolution
                .get(target)
                .ok_or_else(|| Error::UnknownEntity {
                    property: column.property.to_string(),
                    target: target.clone(),
                    span: column.span,
                })?
                .name;
            let key_name = &key.name;
            init = quote!(#init.references(#target_table, #key_name));
        }

        // Record entities bind each column to the originating property.
        if self.table.kind == EntityKind::Record {
            let binding = self.expand_binding(column, converter.as_ref());
            init = quote!(#init #binding);
        }

        Ok(quote!(#property: #init))
    }

    fn expand_binding(
        &self,
        column: &ColumnMeta,
        converter: Option<&syn::Ident>,
    ) -> TokenStream {
        let entity_ty = self.entity_ty();
        let property = &column.property;

        let (get, set) = match converter {
            None => (
                quote! {
                    |entity: &#entity_ty| ormlet::IntoValue::into_value(entity.#property.clone())
                },
                quote! {
                    |entity: &mut #entity_ty, value: ormlet::Value| {
                        entity.#property = ormlet::FromValue::from_value(value)?;
                        Ok(())
                    }
                },
            ),
            Some(converter) if column.nullable => (
                quote! {
                    |entity: &#entity_ty| match &entity.#property {
                        Some(value) => ormlet::Convert::to_value(&#converter, value),
                        None => ormlet::Value::Null,
                    }
                },
                quote! {
                    |entity: &mut #entity_ty, value: ormlet::Value| {
                        entity.#property = match value {
                            ormlet::Value::Null => None,
                            value => Some(ormlet::Convert::from_value(&#converter, value)?),
                        };
                        Ok(())
                    }
                },
            ),
            Some(converter) => (
                quote! {
                    |entity: &#entity_ty| ormlet::Convert::to_value(&#converter, &entity.#property)
                },
                quote! {
                    |entity: &mut #entity_ty, value: ormlet::Value| {
                        entity.#property = ormlet::Convert::from_value(&#converter, value)?;
                        Ok(())
                    }
                },
            ),
        };

        quote!(.bind(#get, #set))
    }
}
