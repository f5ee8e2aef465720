use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{util, Expand};
use crate::schema::Error;

/// Everything the proxy emitters need to know about one property, whether or
/// not it maps to a column.
struct ProxyProperty {
    property: syn::Ident,
    ty: syn::Type,
    value_ty: syn::Type,
    nullable: bool,
    mutable: bool,
    required: bool,
    mapped: bool,
    converter: Option<syn::Ident>,
}

impl Expand<'_> {
    /// Proxy entities: a map-backed struct implementing the declared trait,
    /// its default row mapping, a pseudo-constructor, and a copy helper.
    pub(super) fn expand_proxy(&self) -> Result<TokenStream, Error> {
        let properties = self.proxy_properties()?;

        let proxy_struct = self.expand_proxy_struct();
        let trait_impl = self.expand_proxy_trait_impl(&properties);
        let setters = self.expand_proxy_setters(&properties);
        let from_row = self.expand_proxy_from_row();
        let constructor = self.expand_pseudo_constructor(&properties);
        let copy = self.expand_copy(&properties);

        Ok(quote! {
            #proxy_struct
            #trait_impl
            #setters
            #from_row
            #constructor
            #copy
        })
    }

    fn proxy_properties(&self) -> Result<Vec<ProxyProperty>, Error> {
        let mut properties = Vec::new();

        for column in &self.table.columns {
            let (_, converter) = self.column_storage(column)?;
            properties.push(ProxyProperty {
                property: column.property.clone(),
                ty: column.ty.clone(),
                value_ty: column.value_ty.clone(),
                nullable: column.nullable,
                mutable: column.mutable,
                required: !column.nullable && !column.auto,
                mapped: true,
                converter,
            });
        }

        // Ignored properties still need trait impl coverage; they read and
        // write the map like any other, just without a storage column.
        for field in &self.table.unmapped {
            if field.phantom {
                continue;
            }
            properties.push(ProxyProperty {
                property: field.property.clone(),
                ty: field.ty.clone(),
                value_ty: field.value_ty.clone(),
                nullable: field.nullable,
                mutable: true,
                required: false,
                mapped: false,
                converter: None,
            });
        }

        Ok(properties)
    }

    fn expand_proxy_struct(&self) -> TokenStream {
        let vis = &self.table.vis;
        let proxy_ident = &self.table.proxy_ident;
        let doc = format!("Map-backed proxy implementing [`{}`].", self.table.ident);

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Default, PartialEq)]
            #vis struct #proxy_ident {
                values: ormlet::PropertyMap,
            }

            impl ormlet::Entity for #proxy_ident {}
        }
    }

    fn expand_proxy_trait_impl(&self, properties: &[ProxyProperty]) -> TokenStream {
        let entity_ident = &self.table.ident;
        let proxy_ident = &self.table.proxy_ident;
        let entity_name = entity_ident.to_string();

        let getters = properties.iter().map(|prop| {
            let property = &prop.property;
            let property_name = property.to_string();
            let ty = &prop.ty;
            let panic_arm = quote! {
                Err(err) => panic!(
                    "property `{}` of `{}`: {}", #property_name, #entity_name, err
                ),
            };

            let body = match (&prop.converter, prop.nullable) {
                (None, true) => quote! {
                    match self.values.opt(#property_name) {
                        Ok(value) => value,
                        #panic_arm
                    }
                },
                (None, false) => quote! {
                    match self.values.typed(#property_name) {
                        Ok(value) => value,
                        #panic_arm
                    }
                },
                (Some(converter), true) => quote! {
                    match self.values.value(#property_name) {
                        None => None,
                        Some(ormlet::Value::Null) => None,
                        Some(value) => {
                            match ormlet::Convert::from_value(&#converter, value.clone()) {
                                Ok(value) => Some(value),
                                #panic_arm
                            }
                        }
                    }
                },
                (Some(converter), false) => quote! {
                    let value = self
                        .values
                        .value(#property_name)
                        .cloned()
                        .unwrap_or(ormlet::Value::Null);
                    match ormlet::Convert::from_value(&#converter, value) {
                        Ok(value) => value,
                        #panic_arm
                    }
                },
            };

            quote! {
                fn #property(&self) -> #ty {
                    #body
                }
            }
        });

        quote! {
            impl #entity_ident for #proxy_ident {
                #(#getters)*
            }
        }
    }

    fn expand_proxy_setters(&self, properties: &[ProxyProperty]) -> TokenStream {
        let vis = &self.table.vis;
        let proxy_ident = &self.table.proxy_ident;

        let setters = properties.iter().filter(|prop| prop.mutable).map(|prop| {
            let property = &prop.property;
            let property_name = property.to_string();
            let set_ident = format_ident!("set_{}", property);
            let ty = &prop.ty;

            let body = match (&prop.converter, prop.nullable) {
                (None, _) => quote! {
                    self.values.set(#property_name, ormlet::IntoValue::into_value(value));
                },
                (Some(converter), true) => quote! {
                    match value {
                        Some(value) => self
                            .values
                            .set(#property_name, ormlet::Convert::to_value(&#converter, &value)),
                        None => self.values.set(#property_name, ormlet::Value::Null),
                    }
                },
                (Some(converter), false) => quote! {
                    self.values
                        .set(#property_name, ormlet::Convert::to_value(&#converter, &value));
                },
            };

            quote! {
                #vis fn #set_ident(&mut self, value: #ty) {
                    #body
                }
            }
        });

        quote! {
            impl #proxy_ident {
                #(#setters)*
            }
        }
    }

    /// The default row mapping: every mapped column is copied into the
    /// property map under its property name.
    fn expand_proxy_from_row(&self) -> TokenStream {
        let vis = &self.table.vis;
        let table_ident = &self.table.table_ident;
        let proxy_ident = &self.table.proxy_ident;
        let values = util::ident("values");

        let fills = self.table.columns.iter().map(|column| {
            let property = &column.property;
            let property_name = property.to_string();
            quote! {
                if let Some(value) = row.value(table.#property.name()) {
                    #values.set(#property_name, value.clone());
                }
            }
        });

        quote! {
            impl #proxy_ident {
                /// Materializes one proxy from a result row.
                #vis fn from_row(table: &#table_ident, row: &ormlet::Row) -> ormlet::Result<Self> {
                    let mut #values = ormlet::PropertyMap::new();
                    #(#fills)*
                    Ok(Self { values: #values })
                }
            }
        }
    }

    /// Pseudo-constructor: one optional parameter per column; `None` leaves
    /// the column unset, and a required non-nullable column left unset is a
    /// runtime error.
    fn expand_pseudo_constructor(&self, properties: &[ProxyProperty]) -> TokenStream {
        let vis = &self.table.vis;
        let proxy_ident = &self.table.proxy_ident;
        let ctor_ident = syn::Ident::new(
            &self.table.ident.to_string().to_snake_case(),
            self.table.ident.span(),
        );
        let values = util::ident("values");

        let columns: Vec<&ProxyProperty> =
            properties.iter().filter(|prop| prop.mapped).collect();

        let params = columns.iter().map(|prop| {
            let property = &prop.property;
            let value_ty = &prop.value_ty;
            quote!(#property: Option<#value_ty>)
        });

        let assignments = columns.iter().map(|prop| {
            let property = &prop.property;
            let property_name = property.to_string();
            let encode = encode_value(prop);

            if prop.required {
                quote! {
                    match #property {
                        Some(value) => #values.set(#property_name, #encode),
                        None => return Err(ormlet::Error::required_unset(#property_name)),
                    }
                }
            } else {
                quote! {
                    if let Some(value) = #property {
                        #values.set(#property_name, #encode);
                    }
                }
            }
        });

        let doc = format!("Pseudo-constructor for [`{}`].", self.table.ident);

        quote! {
            #[doc = #doc]
            #vis fn #ctor_ident(#(#params),*) -> ormlet::Result<#proxy_ident> {
                let mut #values = ormlet::PropertyMap::new();
                #(#assignments)*
                Ok(#proxy_ident { values: #values })
            }
        }
    }

    /// Copy helper: starts from the current values and overrides only the
    /// parameters that are supplied.
    fn expand_copy(&self, properties: &[ProxyProperty]) -> TokenStream {
        let vis = &self.table.vis;
        let proxy_ident = &self.table.proxy_ident;
        let values = util::ident("values");

        let columns: Vec<&ProxyProperty> =
            properties.iter().filter(|prop| prop.mapped).collect();

        let params = columns.iter().map(|prop| {
            let property = &prop.property;
            let value_ty = &prop.value_ty;
            quote!(#property: Option<#value_ty>)
        });

        let overrides = columns.iter().map(|prop| {
            let property = &prop.property;
            let property_name = property.to_string();
            let encode = encode_value(prop);
            quote! {
                if let Some(value) = #property {
                    #values.set(#property_name, #encode);
                }
            }
        });

        quote! {
            impl #proxy_ident {
                /// Copy of this proxy with the supplied columns replaced.
                #vis fn copy(&self, #(#params),*) -> #proxy_ident {
                    let mut #values = self.values.clone();
                    #(#overrides)*
                    #proxy_ident { values: #values }
                }
            }
        }
    }
}

fn encode_value(prop: &ProxyProperty) -> TokenStream {
    match &prop.converter {
        None => quote!(ormlet::IntoValue::into_value(value)),
        Some(converter) => quote!(ormlet::Convert::to_value(&#converter, &value)),
    }
}
