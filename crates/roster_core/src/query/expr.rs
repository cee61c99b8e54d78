//! Scalar and aggregate expressions.

use crate::query::path::{Column, MemberPath, Source, TeamPath};
use crate::query::predicate::{CompareOp, InSet, Predicate};
use crate::query::select::{Direction, Order, Select};
use rusqlite::types::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Sum,
    Avg,
    Max,
    Min,
}

impl AggregateFn {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Max => "MAX",
            Self::Min => "MIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// Simple `CASE subject WHEN .. THEN .. ELSE .. END`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub subject: Expr,
    pub arms: Vec<(Expr, Expr)>,
    pub otherwise: Expr,
}

/// Anything that can appear in a projection, comparison, ordering or
/// assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Whole entity. Expands to every column in a projection and to the id
    /// anywhere else.
    Entity(Source),
    Column(Column),
    Literal(Value),
    /// `count(entity)`, counted over the entity id.
    Count(Source),
    Aggregate(AggregateFn, Box<Expr>),
    Arithmetic(Box<Expr>, ArithmeticOp, Box<Expr>),
    Concat(Vec<Expr>),
    /// Text rendering of a value (`CAST(.. AS TEXT)`).
    Text(Box<Expr>),
    Case(Box<CaseExpr>),
    /// Scalar subquery; must select a single column.
    Subquery(Box<Select>),
    /// Projection label, readable through `Tuple::get_named`.
    Labeled(Box<Expr>, &'static str),
}

impl Expr {
    pub fn entity(source: impl Into<Source>) -> Self {
        Self::Entity(source.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }
}

/// Fluent operators shared by columns and expressions.
///
/// `eq`/`ne` take `self` by value, so they resolve ahead of `PartialEq`.
pub trait ExprOps: Into<Expr> + Sized {
    fn expr(self) -> Expr {
        self.into()
    }

    fn eq(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Eq, rhs.into())
    }

    fn ne(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Ne, rhs.into())
    }

    fn lt(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Lt, rhs.into())
    }

    fn loe(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Loe, rhs.into())
    }

    fn gt(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Gt, rhs.into())
    }

    fn goe(self, rhs: impl Into<Expr>) -> Predicate {
        Predicate::compare(self.into(), CompareOp::Goe, rhs.into())
    }

    fn in_values<V, I>(self, values: I) -> Predicate
    where
        V: Into<Expr>,
        I: IntoIterator<Item = V>,
    {
        Predicate::In {
            expr: self.into(),
            set: InSet::List(values.into_iter().map(Into::into).collect()),
        }
    }

    fn in_subquery(self, subquery: Select) -> Predicate {
        Predicate::In {
            expr: self.into(),
            set: InSet::Subquery(Box::new(subquery)),
        }
    }

    fn is_null(self) -> Predicate {
        Predicate::IsNull(self.into())
    }

    fn is_not_null(self) -> Predicate {
        Predicate::IsNotNull(self.into())
    }

    fn asc(self) -> Order {
        Order::new(self.into(), Direction::Asc)
    }

    fn desc(self) -> Order {
        Order::new(self.into(), Direction::Desc)
    }

    fn sum(self) -> Expr {
        Expr::Aggregate(AggregateFn::Sum, Box::new(self.into()))
    }

    fn avg(self) -> Expr {
        Expr::Aggregate(AggregateFn::Avg, Box::new(self.into()))
    }

    fn max(self) -> Expr {
        Expr::Aggregate(AggregateFn::Max, Box::new(self.into()))
    }

    fn min(self) -> Expr {
        Expr::Aggregate(AggregateFn::Min, Box::new(self.into()))
    }

    fn add(self, rhs: impl Into<Expr>) -> Expr {
        arithmetic(self.into(), ArithmeticOp::Add, rhs.into())
    }

    fn subtract(self, rhs: impl Into<Expr>) -> Expr {
        arithmetic(self.into(), ArithmeticOp::Subtract, rhs.into())
    }

    fn multiply(self, rhs: impl Into<Expr>) -> Expr {
        arithmetic(self.into(), ArithmeticOp::Multiply, rhs.into())
    }

    fn divide(self, rhs: impl Into<Expr>) -> Expr {
        arithmetic(self.into(), ArithmeticOp::Divide, rhs.into())
    }

    /// Appends `rhs`; chained calls flatten into one `||` chain.
    fn concat(self, rhs: impl Into<Expr>) -> Expr {
        let mut parts = match self.into() {
            Expr::Concat(parts) => parts,
            other => vec![other],
        };
        parts.push(rhs.into());
        Expr::Concat(parts)
    }

    fn string_value(self) -> Expr {
        Expr::Text(Box::new(self.into()))
    }

    fn when(self, value: impl Into<Expr>) -> CaseWhen {
        CaseBuilder {
            subject: self.into(),
            arms: Vec::new(),
        }
        .when(value)
    }

    fn as_label(self, label: &'static str) -> Expr {
        Expr::Labeled(Box::new(self.into()), label)
    }
}

impl ExprOps for Expr {}
impl ExprOps for Column {}

fn arithmetic(lhs: Expr, op: ArithmeticOp, rhs: Expr) -> Expr {
    Expr::Arithmetic(Box::new(lhs), op, Box::new(rhs))
}

/// `CASE` under construction, after at least one complete arm.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBuilder {
    subject: Expr,
    arms: Vec<(Expr, Expr)>,
}

/// `CASE` arm waiting for its `then` value.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    builder: CaseBuilder,
    value: Expr,
}

impl CaseBuilder {
    pub fn when(self, value: impl Into<Expr>) -> CaseWhen {
        CaseWhen {
            builder: self,
            value: value.into(),
        }
    }

    pub fn otherwise(self, value: impl Into<Expr>) -> Expr {
        Expr::Case(Box::new(CaseExpr {
            subject: self.subject,
            arms: self.arms,
            otherwise: value.into(),
        }))
    }
}

impl CaseWhen {
    pub fn then(self, result: impl Into<Expr>) -> CaseBuilder {
        let mut builder = self.builder;
        builder.arms.push((self.value, result.into()));
        builder
    }
}

impl From<Column> for Expr {
    fn from(value: Column) -> Self {
        Self::Column(value)
    }
}

impl From<MemberPath> for Expr {
    fn from(value: MemberPath) -> Self {
        Self::Entity(value.source())
    }
}

impl From<TeamPath> for Expr {
    fn from(value: TeamPath) -> Self {
        Self::Entity(value.source())
    }
}

impl From<Select> for Expr {
    fn from(value: Select) -> Self {
        Self::Subquery(Box::new(value))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Literal(Value::Integer(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Literal(Value::Integer(i64::from(value)))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Literal(Value::Real(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Literal(Value::Text(value.to_string()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Literal(Value::Text(value))
    }
}

impl From<Uuid> for Expr {
    fn from(value: Uuid) -> Self {
        Self::Literal(Value::Text(value.to_string()))
    }
}
