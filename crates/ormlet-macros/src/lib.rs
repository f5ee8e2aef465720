extern crate proc_macro;

use proc_macro::TokenStream;

/// Expands a schema module into its mapping declarations: table descriptors,
/// column bindings, row materialization, proxy constructors, and the enabled
/// sequence/insert/update helpers.
#[proc_macro]
pub fn schema(input: TokenStream) -> TokenStream {
    match ormlet_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
