use super::NamingSpec;

/// Global configuration, read once per run from the single `#[database]`
/// declaration in the schema module.
#[derive(Debug)]
pub(crate) struct Config {
    /// Globally configured naming strategy
    pub(crate) naming: Option<NamingSpec>,

    /// Registered converters, in registration order
    pub(crate) converters: Vec<syn::Ident>,

    /// Converter applied to enumeration value types with no explicit override
    pub(crate) default_enum_converter: Option<syn::Ident>,

    /// Permit `#[default]` expressions to stand in for missing columns
    /// during row materialization
    pub(crate) allow_default_construction: bool,

    /// Emit one collection accessor per table
    pub(crate) sequence_accessors: bool,

    /// Emit insert helpers for record entities
    pub(crate) insert_helpers: bool,

    /// Emit update helpers for record entities
    pub(crate) update_helpers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            naming: None,
            converters: vec![],
            default_enum_converter: None,
            allow_default_construction: false,
            sequence_accessors: true,
            insert_helpers: false,
            update_helpers: false,
        }
    }
}

impl Config {
    pub(crate) fn from_ast(attr: &syn::Attribute) -> syn::Result<Self> {
        let mut config = Config::default();

        if let syn::Meta::Path(_) = &attr.meta {
            return Ok(config);
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("naming") {
                let value = meta.value()?;
                config.naming = Some(NamingSpec::from_path(value.parse()?));
            } else if meta.path.is_ident("converters") {
                meta.parse_nested_meta(|converter| {
                    let ident = converter
                        .path
                        .get_ident()
                        .cloned()
                        .ok_or_else(|| converter.error("expected a converter name"))?;
                    config.converters.push(ident);
                    Ok(())
                })?;
            } else if meta.path.is_ident("default_enum_converter") {
                let value = meta.value()?;
                config.default_enum_converter = Some(value.parse()?);
            } else if meta.path.is_ident("allow_default_construction") {
                config.allow_default_construction = flag(&meta)?;
            } else if meta.path.is_ident("sequence_accessors") {
                config.sequence_accessors = flag(&meta)?;
            } else if meta.path.is_ident("insert_helpers") {
                config.insert_helpers = flag(&meta)?;
            } else if meta.path.is_ident("update_helpers") {
                config.update_helpers = flag(&meta)?;
            } else {
                return Err(meta.error(
                    "expected `naming`, `converters`, `default_enum_converter`, \
                     `allow_default_construction`, `sequence_accessors`, `insert_helpers`, \
                     or `update_helpers`",
                ));
            }

            Ok(())
        })?;

        Ok(config)
    }
}

/// A bare option name enables; `name = false` disables.
fn flag(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value())
    } else {
        Ok(true)
    }
}
