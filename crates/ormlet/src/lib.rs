mod convert;
mod database;
mod entity;
mod error;
mod exec;
mod naming;
mod row;
mod sequence;
mod table;
mod types;
mod value;

pub use convert::Convert;
pub use database::Database;
pub use entity::{Entity, PropertyMap};
pub use error::{Error, Result};
pub use exec::{Assignment, Executor, InsertResult, MemoryExecutor};
pub use naming::NamingStrategy;
pub use row::Row;
pub use sequence::{Condition, EntitySequence, SortOrder};
pub use table::{Column, ColumnRef, Table, TableDescriptor};
pub use types::SqlType;
pub use value::{FromValue, IntoValue, Value};

/// Expands a schema module into mapping declarations.
///
/// The module may contain record entities (`#[entity]` structs), proxy
/// entities (`#[entity]` traits extending [`Entity`]), converter declarations,
/// plain enums, and exactly one `#[database(..)]` configuration item.
pub use ormlet_macros::schema;
