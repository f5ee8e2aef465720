/// Maps raw declaration identifiers to storage names.
///
/// The builtin strategies are applied while generating; a custom strategy
/// type referenced in configuration is invoked through this trait from the
/// generated descriptor initializer instead, since it is not statically
/// invocable at generation time.
pub trait NamingStrategy {
    fn table_name(&self, raw: &str) -> String;

    fn column_name(&self, raw: &str) -> String;
}
