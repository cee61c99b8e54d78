//! Set-based update and delete statements.
//!
//! These bypass the persistence context: entities loaded before the
//! statement keep their old values until the engine cache is invalidated.

use crate::query::condition::{all_of, Condition};
use crate::query::expr::Expr;
use crate::query::path::{Column, Source};
use crate::query::predicate::Predicate;

/// `column = value` inside a bulk update.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Column,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkUpdate {
    pub(crate) target: Source,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) filter: Predicate,
}

impl BulkUpdate {
    pub fn table(target: impl Into<Source>) -> Self {
        Self {
            target: target.into(),
            assignments: Vec::new(),
            filter: Predicate::True,
        }
    }

    pub fn set(mut self, column: Column, value: impl Into<Expr>) -> Self {
        self.assignments.push(Assignment {
            column,
            value: value.into(),
        });
        self
    }

    pub fn where_(mut self, predicate: Predicate) -> Self {
        let current = std::mem::replace(&mut self.filter, Predicate::True);
        self.filter = current.and(predicate);
        self
    }

    pub fn where_all(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.where_(all_of(conditions))
    }

    pub fn target(&self) -> Source {
        self.target
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkDelete {
    pub(crate) target: Source,
    pub(crate) filter: Predicate,
}

impl BulkDelete {
    /// Deletes every row of `target`; narrow it with [`BulkDelete::where_`].
    pub fn from(target: impl Into<Source>) -> Self {
        Self {
            target: target.into(),
            filter: Predicate::True,
        }
    }

    pub fn where_(mut self, predicate: Predicate) -> Self {
        let current = std::mem::replace(&mut self.filter, Predicate::True);
        self.filter = current.and(predicate);
        self
    }

    pub fn target(&self) -> Source {
        self.target
    }
}
