use std::sync::Arc;

use crate::{Executor, Result, Row, Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filter expression over storage column values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq { column: String, value: Value },
    And(Vec<Condition>),
}

impl Condition {
    /// Conjoins two conditions, flattening nested `And`s.
    pub fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::And(mut left), Condition::And(right)) => {
                left.extend(right);
                Condition::And(left)
            }
            (Condition::And(mut left), right) => {
                left.push(right);
                Condition::And(left)
            }
            (left, Condition::And(mut right)) => {
                right.insert(0, left);
                Condition::And(right)
            }
            (left, right) => Condition::And(vec![left, right]),
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::Eq { column, value } => row.value(column) == Some(value),
            Condition::And(conditions) => {
                conditions.iter().all(|condition| condition.matches(row))
            }
        }
    }
}

/// The default queryable collection bound to one table.
///
/// `filter`, `sort_by`, `group_by`, `skip` and `take` derive a modified view;
/// entity mutation helpers refuse to run on such a view.
pub struct EntitySequence<T: Table> {
    table: T,
    executor: Arc<dyn Executor>,
    filters: Vec<Condition>,
    sort: Vec<(String, SortOrder)>,
    groups: Vec<String>,
    skip: Option<u64>,
    limit: Option<u64>,
}

impl<T: Table> EntitySequence<T> {
    pub(crate) fn new(table: T, executor: Arc<dyn Executor>) -> Self {
        Self {
            table,
            executor,
            filters: Vec::new(),
            sort: Vec::new(),
            groups: Vec::new(),
            skip: None,
            limit: None,
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn sort_by(mut self, column: &crate::Column<T::Entity>, order: SortOrder) -> Self {
        self.sort.push((column.name().to_owned(), order));
        self
    }

    pub fn group_by(mut self, column: &crate::Column<T::Entity>) -> Self {
        self.groups.push(column.name().to_owned());
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(self.skip.unwrap_or(0) + n);
        self
    }

    pub fn take(mut self, n: u64) -> Self {
        self.limit = Some(self.limit.map_or(n, |limit| limit.min(n)));
        self
    }

    /// True when any filter, sort, grouping, or paging modifier is applied.
    pub fn is_derived(&self) -> bool {
        !self.filters.is_empty()
            || !self.sort.is_empty()
            || !self.groups.is_empty()
            || self.skip.is_some()
            || self.limit.is_some()
    }

    /// Refuses `operation` unless this is the unmodified default collection.
    pub fn check_unmodified(&self, operation: &str) -> Result<()> {
        if self.is_derived() {
            return Err(crate::Error::derived_view(operation));
        }
        Ok(())
    }

    /// All filters conjoined, `None` when unfiltered.
    pub fn condition(&self) -> Option<Condition> {
        self.filters
            .iter()
            .cloned()
            .reduce(|acc, condition| acc.and(condition))
    }

    pub fn rows(&self) -> Result<Vec<Row>> {
        let mut rows = self.executor.scan(self.table.descriptor())?;

        if let Some(condition) = self.condition() {
            rows.retain(|row| condition.matches(row));
        }

        for (column, order) in self.sort.iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = match (a.value(column), b.value(column)) {
                    (Some(a), Some(b)) => {
                        a.compare(b).unwrap_or(std::cmp::Ordering::Equal)
                    }
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(skip) = self.skip {
            rows.drain(..(skip as usize).min(rows.len()));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens() {
        let a = Condition::Eq {
            column: "a".into(),
            value: Value::I64(1),
        };
        let b = Condition::Eq {
            column: "b".into(),
            value: Value::I64(2),
        };
        let c = Condition::Eq {
            column: "c".into(),
            value: Value::I64(3),
        };

        let combined = a.clone().and(b.clone()).and(c.clone());
        assert_eq!(combined, Condition::And(vec![a, b, c]));
    }

    #[test]
    fn eq_matches_row() {
        let condition = Condition::Eq {
            column: "id".into(),
            value: Value::I64(7),
        };
        let hit = Row::new().with("id", Value::I64(7));
        let miss = Row::new().with("id", Value::I64(8));

        assert!(condition.matches(&hit));
        assert!(!condition.matches(&miss));
        assert!(!condition.matches(&Row::new()));
    }
}
