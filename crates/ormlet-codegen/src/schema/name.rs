/// A declaration identifier kept in both raw and code-identifier form.
#[derive(Debug, Clone)]
pub(crate) struct Name {
    /// Raw identifier text as written in the declaration
    pub(crate) raw: String,

    /// field/var identifier
    pub(crate) ident: syn::Ident,
}

impl Name {
    pub(crate) fn from_ident(ident: &syn::Ident) -> Self {
        Self {
            raw: ident.to_string(),
            ident: ident.clone(),
        }
    }
}
