use std::collections::HashMap;
use std::sync::Mutex;

use crate::{Condition, Result, Row, TableDescriptor, Value};

/// One column-value pair of an insert or update assignment list.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertResult {
    pub rows_affected: u64,
    pub generated_key: Option<Value>,
}

/// Execution seam the generated helpers run against.
///
/// This is not a query engine; it is the minimal surface the generated
/// sequence, insert, and update code needs.
pub trait Executor: Send + Sync {
    /// All rows of `table`.
    fn scan(&self, table: &TableDescriptor) -> Result<Vec<Row>>;

    /// Inserts one row from an ordered assignment list. When
    /// `generated_key` names a column absent from the assignments, the
    /// executor generates a value for it and returns that value.
    fn insert(
        &self,
        table: &TableDescriptor,
        assignments: &[Assignment],
        generated_key: Option<&str>,
    ) -> Result<InsertResult>;

    /// Applies an assignment list to every row matching `condition`,
    /// returning the affected-row count.
    fn update(
        &self,
        table: &TableDescriptor,
        assignments: &[Assignment],
        condition: &Condition,
    ) -> Result<u64>;
}

#[derive(Default)]
struct MemTable {
    rows: Vec<Row>,
    next_key: i64,
}

/// In-memory executor used by the test suites and example scenarios. Tables
/// spring into existence on first insert; generated keys are a per-table
/// monotonic `i64`.
#[derive(Default)]
pub struct MemoryExecutor {
    tables: Mutex<HashMap<String, MemTable>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for MemoryExecutor {
    fn scan(&self, table: &TableDescriptor) -> Result<Vec<Row>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(table.name())
            .map(|table| table.rows.clone())
            .unwrap_or_default())
    }

    fn insert(
        &self,
        table: &TableDescriptor,
        assignments: &[Assignment],
        generated_key: Option<&str>,
    ) -> Result<InsertResult> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(table.name().to_owned()).or_default();

        let mut row = Row::new();
        for assignment in assignments {
            row.set(assignment.column.clone(), assignment.value.clone());
        }

        let mut generated = None;
        if let Some(key_column) = generated_key {
            if row.value(key_column).is_none() {
                table.next_key += 1;
                let key = Value::I64(table.next_key);
                row.set(key_column, key.clone());
                generated = Some(key);
            }
        }

        table.rows.push(row);
        Ok(InsertResult {
            rows_affected: 1,
            generated_key: generated,
        })
    }

    fn update(
        &self,
        table: &TableDescriptor,
        assignments: &[Assignment],
        condition: &Condition,
    ) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let Some(table) = tables.get_mut(table.name()) else {
            return Ok(0);
        };

        let mut affected = 0;
        for row in &mut table.rows {
            if condition.matches(row) {
                for assignment in assignments {
                    row.set(assignment.column.clone(), assignment.value.clone());
                }
                affected += 1;
            }
        }
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct() {
        let executor = MemoryExecutor::new();
        let table = TableDescriptor::new("user");

        let first = executor
            .insert(&table, &[Assignment::new("name", Value::String("a".into()))], Some("id"))
            .unwrap();
        let second = executor
            .insert(&table, &[Assignment::new("name", Value::String("b".into()))], Some("id"))
            .unwrap();

        let first = first.generated_key.unwrap();
        let second = second.generated_key.unwrap();
        assert!(!first.is_null());
        assert!(!second.is_null());
        assert_ne!(first, second);
    }

    #[test]
    fn explicit_key_is_not_regenerated() {
        let executor = MemoryExecutor::new();
        let table = TableDescriptor::new("user");

        let result = executor
            .insert(&table, &[Assignment::new("id", Value::I64(42))], Some("id"))
            .unwrap();
        assert_eq!(result.generated_key, None);

        let rows = executor.scan(&table).unwrap();
        assert_eq!(rows[0].value("id"), Some(&Value::I64(42)));
    }

    #[test]
    fn update_applies_only_to_matching_rows() {
        let executor = MemoryExecutor::new();
        let table = TableDescriptor::new("user");
        executor
            .insert(&table, &[Assignment::new("id", Value::I64(1))], None)
            .unwrap();
        executor
            .insert(&table, &[Assignment::new("id", Value::I64(2))], None)
            .unwrap();

        let affected = executor
            .update(
                &table,
                &[Assignment::new("name", Value::String("x".into()))],
                &Condition::Eq {
                    column: "id".into(),
                    value: Value::I64(2),
                },
            )
            .unwrap();

        assert_eq!(affected, 1);
        let rows = executor.scan(&table).unwrap();
        assert_eq!(rows[0].value("name"), None);
        assert_eq!(rows[1].value("name"), Some(&Value::String("x".into())));
    }
}
