use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

/// A naming strategy as written in configuration: one of the statically
/// known builtins, or a type whose [`NamingStrategy`] impl is only invocable
/// at runtime.
#[derive(Debug, Clone)]
pub(crate) enum NamingSpec {
    Builtin(BuiltinStrategy),
    Runtime(syn::Path),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinStrategy {
    LowerSnake,
    UpperSnake,
    LowerCamel,
    UpperCamel,
}

impl NamingSpec {
    pub(crate) fn from_path(path: syn::Path) -> Self {
        if let Some(ident) = path.get_ident() {
            let builtin = match ident.to_string().as_str() {
                "lower_snake_case" => Some(BuiltinStrategy::LowerSnake),
                "upper_snake_case" => Some(BuiltinStrategy::UpperSnake),
                "lower_camel_case" => Some(BuiltinStrategy::LowerCamel),
                "upper_camel_case" => Some(BuiltinStrategy::UpperCamel),
                _ => None,
            };
            if let Some(builtin) = builtin {
                return NamingSpec::Builtin(builtin);
            }
        }
        NamingSpec::Runtime(path)
    }
}

impl BuiltinStrategy {
    fn apply(&self, raw: &str) -> String {
        match self {
            BuiltinStrategy::LowerSnake => raw.to_snake_case(),
            BuiltinStrategy::UpperSnake => raw.to_shouty_snake_case(),
            BuiltinStrategy::LowerCamel => raw.to_lower_camel_case(),
            BuiltinStrategy::UpperCamel => raw.to_upper_camel_case(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameKind {
    Table,
    Column,
}

/// A resolved storage name: known at generation time, or produced by a
/// runtime strategy call emitted into the generated initializer.
#[derive(Debug, Clone)]
pub(crate) enum NameExpr {
    Static(String),
    Runtime {
        strategy: syn::Path,
        raw: String,
        kind: NameKind,
    },
}

impl NameExpr {
    /// The generation-time name, when one exists.
    pub(crate) fn static_name(&self) -> Option<&str> {
        match self {
            NameExpr::Static(name) => Some(name),
            NameExpr::Runtime { .. } => None,
        }
    }
}

impl ToTokens for NameExpr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            NameExpr::Static(name) => quote!(#name).to_tokens(tokens),
            NameExpr::Runtime { strategy, raw, kind } => {
                let method = match kind {
                    NameKind::Table => quote!(table_name),
                    NameKind::Column => quote!(column_name),
                };
                quote!(ormlet::NamingStrategy::#method(&#strategy, #raw)).to_tokens(tokens)
            }
        }
    }
}

fn resolve(
    kind: NameKind,
    raw: &str,
    explicit: Option<&syn::LitStr>,
    table_strategy: Option<&NamingSpec>,
    global_strategy: Option<&NamingSpec>,
) -> NameExpr {
    // Highest precedence: a non-empty explicit override.
    if let Some(explicit) = explicit {
        let value = explicit.value();
        if !value.is_empty() {
            return NameExpr::Static(value);
        }
    }

    let strategy = table_strategy.or(global_strategy);
    match strategy {
        Some(NamingSpec::Builtin(builtin)) => NameExpr::Static(builtin.apply(raw)),
        Some(NamingSpec::Runtime(path)) => NameExpr::Runtime {
            strategy: path.clone(),
            raw: raw.to_owned(),
            kind,
        },
        // Fallback of last resort: the raw identifier unchanged.
        None => NameExpr::Static(raw.to_owned()),
    }
}

pub(crate) fn resolve_table_name(
    raw: &str,
    explicit: Option<&syn::LitStr>,
    table_strategy: Option<&NamingSpec>,
    global_strategy: Option<&NamingSpec>,
) -> NameExpr {
    resolve(NameKind::Table, raw, explicit, table_strategy, global_strategy)
}

pub(crate) fn resolve_column_name(
    raw: &str,
    explicit: Option<&syn::LitStr>,
    table_strategy: Option<&NamingSpec>,
    global_strategy: Option<&NamingSpec>,
) -> NameExpr {
    resolve(NameKind::Column, raw, explicit, table_strategy, global_strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    fn lit(value: &str) -> syn::LitStr {
        syn::LitStr::new(value, proc_macro2::Span::call_site())
    }

    fn local() -> NamingSpec {
        NamingSpec::Builtin(BuiltinStrategy::UpperSnake)
    }

    fn global() -> NamingSpec {
        NamingSpec::Builtin(BuiltinStrategy::LowerSnake)
    }

    #[test]
    fn table_name_precedence_matrix() {
        // (1) explicit override always wins
        let name = resolve_table_name("UserProfile", Some(&lit("t_up")), Some(&local()), Some(&global()));
        assert_eq!(name.static_name(), Some("t_up"));

        // (2) without the override the table-local strategy applies
        let name = resolve_table_name("UserProfile", None, Some(&local()), Some(&global()));
        assert_eq!(name.static_name(), Some("USER_PROFILE"));

        // (3) without a local strategy the global strategy applies
        let name = resolve_table_name("UserProfile", None, None, Some(&global()));
        assert_eq!(name.static_name(), Some("user_profile"));

        // (4) raw identifier as the fallback of last resort
        let name = resolve_table_name("UserProfile", None, None, None);
        assert_eq!(name.static_name(), Some("UserProfile"));
    }

    #[test]
    fn column_name_precedence_matrix() {
        let name = resolve_column_name("firstName", Some(&lit("fn")), Some(&local()), Some(&global()));
        assert_eq!(name.static_name(), Some("fn"));

        let name = resolve_column_name("firstName", None, Some(&local()), Some(&global()));
        assert_eq!(name.static_name(), Some("FIRST_NAME"));

        let name = resolve_column_name("firstName", None, None, Some(&global()));
        assert_eq!(name.static_name(), Some("first_name"));

        let name = resolve_column_name("firstName", None, None, None);
        assert_eq!(name.static_name(), Some("firstName"));
    }

    #[test]
    fn empty_explicit_override_falls_through() {
        let name = resolve_table_name("User", Some(&lit("")), None, Some(&global()));
        assert_eq!(name.static_name(), Some("user"));
    }

    #[test]
    fn custom_strategy_defers_to_runtime_call() {
        let spec = NamingSpec::from_path(parse_quote!(MyNaming));
        let name = resolve_table_name("User", None, None, Some(&spec));
        assert_eq!(name.static_name(), None);

        let tokens = quote::quote!(#name).to_string();
        assert!(tokens.contains("table_name"));
        assert!(tokens.contains("MyNaming"));
    }

    #[test]
    fn builtin_strategy_is_recognized_by_ident() {
        let spec = NamingSpec::from_path(parse_quote!(lower_snake_case));
        assert!(matches!(
            spec,
            NamingSpec::Builtin(BuiltinStrategy::LowerSnake)
        ));
    }
}
