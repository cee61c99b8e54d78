//! Select statement builder.
//!
//! Mirrors the clause order of the rendered SQL: projection, sources,
//! joins, filter, grouping, ordering, paging. Every builder method consumes
//! and returns the statement so queries read as one chain.

use crate::query::condition::{all_of, Condition};
use crate::query::expr::Expr;
use crate::query::path::{Relation, Source};
use crate::query::predicate::Predicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// One joined source.
///
/// `relation` is set for association joins (`m.team_id = t.id`); unrelated
/// joins match on `on` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub target: Source,
    pub relation: Option<Relation>,
    pub on: Predicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub expr: Expr,
    pub direction: Direction,
    pub nulls: Option<NullOrdering>,
}

impl Order {
    pub fn new(expr: Expr, direction: Direction) -> Self {
        Self {
            expr,
            direction,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullOrdering::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullOrdering::Last);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub(crate) projection: Vec<Expr>,
    pub(crate) sources: Vec<Source>,
    pub(crate) joins: Vec<Join>,
    pub(crate) filter: Predicate,
    pub(crate) group_by: Vec<Expr>,
    pub(crate) having: Predicate,
    pub(crate) order_by: Vec<Order>,
    pub(crate) offset: Option<u32>,
    pub(crate) limit: Option<u32>,
}

impl Select {
    /// Starts a statement projecting `exprs`; add sources with [`Select::from`].
    pub fn select(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            projection: exprs.into_iter().collect(),
            sources: Vec::new(),
            joins: Vec::new(),
            filter: Predicate::True,
            group_by: Vec::new(),
            having: Predicate::True,
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Selects the whole entity behind `source` from that source.
    pub fn select_from(source: impl Into<Source>) -> Self {
        let source = source.into();
        Self::select([Expr::Entity(source)]).from(source)
    }

    /// Adds a source. More than one source forms a theta join, to be
    /// constrained in the filter.
    pub fn from(mut self, source: impl Into<Source>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Inner join over an association.
    pub fn join(self, relation: Relation, target: impl Into<Source>) -> Self {
        self.push_join(JoinKind::Inner, target.into(), Some(relation))
    }

    /// Left outer join over an association.
    pub fn left_join(self, relation: Relation, target: impl Into<Source>) -> Self {
        self.push_join(JoinKind::Left, target.into(), Some(relation))
    }

    /// Left outer join with no association; rows match through `on` only.
    pub fn left_join_unrelated(self, target: impl Into<Source>) -> Self {
        self.push_join(JoinKind::Left, target.into(), None)
    }

    /// Adds `predicate` to the join condition of the most recent join.
    ///
    /// With no join yet this narrows the filter instead.
    pub fn on(mut self, predicate: Predicate) -> Self {
        if self.joins.is_empty() {
            return self.where_(predicate);
        }
        if let Some(join) = self.joins.last_mut() {
            let current = std::mem::replace(&mut join.on, Predicate::True);
            join.on = current.and(predicate);
        }
        self
    }

    /// Narrows the filter with `predicate` (AND).
    pub fn where_(mut self, predicate: Predicate) -> Self {
        let current = std::mem::replace(&mut self.filter, Predicate::True);
        self.filter = current.and(predicate);
        self
    }

    /// Narrows the filter with every constrained condition, skipping
    /// unconstrained ones.
    pub fn where_all(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.where_(all_of(conditions))
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn having(mut self, predicate: Predicate) -> Self {
        let current = std::mem::replace(&mut self.having, Predicate::True);
        self.having = current.and(predicate);
        self
    }

    pub fn order_by(mut self, orders: impl IntoIterator<Item = Order>) -> Self {
        self.order_by.extend(orders);
        self
    }

    /// Rows to skip, zero-based.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Same sources, joins and filter with a different projection, no
    /// ordering and no paging. Used for count queries next to a page query.
    pub fn reprojected(&self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            projection: exprs.into_iter().collect(),
            sources: self.sources.clone(),
            joins: self.joins.clone(),
            filter: self.filter.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    pub fn projection(&self) -> &[Expr] {
        &self.projection
    }

    pub fn filter(&self) -> &Predicate {
        &self.filter
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    fn push_join(mut self, kind: JoinKind, target: Source, relation: Option<Relation>) -> Self {
        self.joins.push(Join {
            kind,
            target,
            relation,
            on: Predicate::True,
        });
        self
    }
}
