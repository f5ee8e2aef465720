//! Integration test support: every test drives generated mapping code
//! against the in-memory executor.

use ormlet::Database;

/// A fresh database backed by the in-memory executor.
pub fn db() -> Database {
    Database::in_memory()
}
