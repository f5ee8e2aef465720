mod driver;
mod expand;
mod schema;

pub use driver::{generate, DriverError, GeneratedSet, GeneratedUnit, Generator};
pub use schema::Error;
