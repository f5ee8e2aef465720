use std::sync::Arc;

use crate::{EntitySequence, Executor, MemoryExecutor, Table};

/// Handle to an execution backend; the root from which default entity
/// sequences are obtained.
#[derive(Clone)]
pub struct Database {
    executor: Arc<dyn Executor>,
}

impl Database {
    pub fn new(executor: impl Executor + 'static) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryExecutor::new())
    }

    /// The unmodified default collection of entities for `T`.
    pub fn sequence_of<T: Table + Default>(&self) -> EntitySequence<T> {
        EntitySequence::new(T::default(), self.executor.clone())
    }
}
