/// Creates an identifier prefixed with `__ormlet_` to avoid collisions with
/// user-declared property names in generated code.
pub(crate) fn ident(name: &str) -> syn::Ident {
    quote::format_ident!("__ormlet_{name}")
}
