//! Boolean filter AST.
//!
//! `Predicate::True` is the identity of `and`: a statement whose filter is
//! `True` renders without a `WHERE` clause.

use crate::query::expr::Expr;
use crate::query::select::Select;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Loe,
    Gt,
    Goe,
}

impl CompareOp {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Loe => "<=",
            Self::Gt => ">",
            Self::Goe => ">=",
        }
    }
}

/// Right-hand side of `IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    List(Vec<Expr>),
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    True,
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    In {
        expr: Expr,
        set: InSet,
    },
    IsNull(Expr),
    IsNotNull(Expr),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Self::Compare { left, op, right }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Conjunction that drops `True` operands and flattens nested `And`s.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Self::True, rhs) => rhs,
            (lhs, Self::True) => lhs,
            (Self::And(mut lhs), Self::And(rhs)) => {
                lhs.extend(rhs);
                Self::And(lhs)
            }
            (Self::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::And(lhs)
            }
            (lhs, Self::And(rhs)) => {
                let mut parts = Vec::with_capacity(rhs.len() + 1);
                parts.push(lhs);
                parts.extend(rhs);
                Self::And(parts)
            }
            (lhs, rhs) => Self::And(vec![lhs, rhs]),
        }
    }

    /// Disjunction; `True` on either side absorbs the other.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::Or(lhs)
            }
            (lhs, rhs) => Self::Or(vec![lhs, rhs]),
        }
    }

    pub fn negate(self) -> Predicate {
        Self::Not(Box::new(self))
    }

    /// Folds `predicates` with `and`; an empty input yields `True`.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates.into_iter().fold(Self::True, Self::and)
    }
}
