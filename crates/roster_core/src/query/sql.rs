//! Lowering of statements to SQLite SQL.
//!
//! # Invariants
//! - Literals are always emitted as `?` placeholders, in the same order as
//!   `SqlStatement::binds`.
//! - A `True` filter emits no `WHERE`/`HAVING` clause.
//! - Entities expand to their columns in `Table::columns` order inside a
//!   projection and to their id everywhere else.

use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::Expr;
use crate::query::mutation::{BulkDelete, BulkUpdate};
use crate::query::path::{Column, Source};
use crate::query::predicate::{CompareOp, InSet, Predicate};
use crate::query::select::{Direction, Join, JoinKind, NullOrdering, Order, Select};
use rusqlite::types::Value;

/// Rendered SQL plus positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<Value>,
}

pub fn render_select(select: &Select) -> QueryResult<SqlStatement> {
    let mut writer = SqlWriter::default();
    writer.select(select)?;
    Ok(writer.finish())
}

pub fn render_update(update: &BulkUpdate) -> QueryResult<SqlStatement> {
    if update.assignments.is_empty() {
        return Err(QueryError::NoAssignments);
    }

    let mut writer = SqlWriter::default();
    writer.push("UPDATE ");
    writer.source(update.target);
    writer.push(" SET ");
    for (index, assignment) in update.assignments.iter().enumerate() {
        ensure_owned_by(assignment.column, update.target)?;
        if index > 0 {
            writer.push(", ");
        }
        writer.push(assignment.column.name);
        writer.push(" = ");
        writer.expr(&assignment.value)?;
    }
    writer.where_clause(&update.filter)?;
    Ok(writer.finish())
}

pub fn render_delete(delete: &BulkDelete) -> QueryResult<SqlStatement> {
    let mut writer = SqlWriter::default();
    writer.push("DELETE FROM ");
    writer.source(delete.target);
    writer.where_clause(&delete.filter)?;
    Ok(writer.finish())
}

fn ensure_owned_by(column: Column, target: Source) -> QueryResult<()> {
    if column.source != target {
        return Err(QueryError::ForeignColumn {
            column: column.qualified(),
            target: target.alias,
        });
    }
    Ok(())
}

#[derive(Debug, Default)]
struct SqlWriter {
    sql: String,
    binds: Vec<Value>,
}

impl SqlWriter {
    fn finish(self) -> SqlStatement {
        SqlStatement {
            sql: self.sql,
            binds: self.binds,
        }
    }

    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn bind(&mut self, value: &Value) {
        self.sql.push('?');
        self.binds.push(value.clone());
    }

    fn source(&mut self, source: Source) {
        self.push(source.table.name());
        self.push(" AS ");
        self.push(source.alias);
    }

    fn select(&mut self, select: &Select) -> QueryResult<()> {
        if select.projection.is_empty() {
            return Err(QueryError::EmptyProjection);
        }
        if select.sources.is_empty() {
            return Err(QueryError::MissingSource);
        }

        self.push("SELECT ");
        for (index, expr) in select.projection.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.projected(expr)?;
        }

        self.push(" FROM ");
        for (index, source) in select.sources.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.source(*source);
        }

        for join in &select.joins {
            self.join(join)?;
        }

        self.where_clause(&select.filter)?;

        if !select.group_by.is_empty() {
            self.push(" GROUP BY ");
            for (index, expr) in select.group_by.iter().enumerate() {
                if index > 0 {
                    self.push(", ");
                }
                self.expr(expr)?;
            }
        }

        if !select.having.is_true() {
            self.push(" HAVING ");
            self.predicate(&select.having)?;
        }

        if !select.order_by.is_empty() {
            self.push(" ORDER BY ");
            for (index, order) in select.order_by.iter().enumerate() {
                if index > 0 {
                    self.push(", ");
                }
                self.order(order)?;
            }
        }

        match (select.limit, select.offset) {
            (Some(limit), offset) => {
                self.push(" LIMIT ");
                self.bind(&Value::Integer(i64::from(limit)));
                if let Some(offset) = offset.filter(|offset| *offset > 0) {
                    self.push(" OFFSET ");
                    self.bind(&Value::Integer(i64::from(offset)));
                }
            }
            (None, Some(offset)) if offset > 0 => {
                self.push(" LIMIT -1 OFFSET ");
                self.bind(&Value::Integer(i64::from(offset)));
            }
            (None, _) => {}
        }

        Ok(())
    }

    fn join(&mut self, join: &Join) -> QueryResult<()> {
        self.push(match join.kind {
            JoinKind::Inner => " JOIN ",
            JoinKind::Left => " LEFT JOIN ",
        });
        self.source(join.target);
        self.push(" ON ");

        let on = match join.relation {
            Some(relation) => {
                if relation.target != join.target.table {
                    return Err(QueryError::RelationMismatch {
                        relation: relation.foreign_key.name,
                        target: join.target.table.name(),
                    });
                }
                let target_id = Column {
                    source: join.target,
                    name: "id",
                };
                Predicate::compare(
                    Expr::Column(relation.foreign_key),
                    CompareOp::Eq,
                    Expr::Column(target_id),
                )
                .and(join.on.clone())
            }
            None => join.on.clone(),
        };
        self.predicate(&on)
    }

    fn where_clause(&mut self, filter: &Predicate) -> QueryResult<()> {
        if filter.is_true() {
            return Ok(());
        }
        self.push(" WHERE ");
        self.predicate(filter)
    }

    fn order(&mut self, order: &Order) -> QueryResult<()> {
        self.expr(&order.expr)?;
        self.push(match order.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
        match order.nulls {
            Some(NullOrdering::First) => self.push(" NULLS FIRST"),
            Some(NullOrdering::Last) => self.push(" NULLS LAST"),
            None => {}
        }
        Ok(())
    }

    fn projected(&mut self, expr: &Expr) -> QueryResult<()> {
        match expr {
            Expr::Entity(source) => {
                for (index, column) in source.table.columns().iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.push(source.alias);
                    self.push(".");
                    self.push(column);
                }
                Ok(())
            }
            Expr::Labeled(inner, label) => {
                self.expr(inner)?;
                self.push(" AS \"");
                self.push(&label.replace('"', "\"\""));
                self.push("\"");
                Ok(())
            }
            other => self.expr(other),
        }
    }

    fn expr(&mut self, expr: &Expr) -> QueryResult<()> {
        match expr {
            Expr::Entity(source) => {
                self.push(source.alias);
                self.push(".id");
            }
            Expr::Count(source) => {
                self.push("COUNT(");
                self.push(source.alias);
                self.push(".id)");
            }
            Expr::Column(column) => self.push(&column.qualified()),
            Expr::Literal(value) => self.bind(value),
            Expr::Aggregate(function, inner) => {
                self.push(function.sql());
                self.push("(");
                self.expr(inner)?;
                self.push(")");
            }
            Expr::Arithmetic(lhs, op, rhs) => {
                self.push("(");
                self.expr(lhs)?;
                self.push(" ");
                self.push(op.sql());
                self.push(" ");
                self.expr(rhs)?;
                self.push(")");
            }
            Expr::Concat(parts) => {
                self.push("(");
                for (index, part) in parts.iter().enumerate() {
                    if index > 0 {
                        self.push(" || ");
                    }
                    self.expr(part)?;
                }
                self.push(")");
            }
            Expr::Text(inner) => {
                self.push("CAST(");
                self.expr(inner)?;
                self.push(" AS TEXT)");
            }
            Expr::Case(case) => {
                self.push("CASE ");
                self.expr(&case.subject)?;
                for (when, then) in &case.arms {
                    self.push(" WHEN ");
                    self.expr(when)?;
                    self.push(" THEN ");
                    self.expr(then)?;
                }
                self.push(" ELSE ");
                self.expr(&case.otherwise)?;
                self.push(" END");
            }
            Expr::Subquery(select) => {
                self.push("(");
                self.select(select)?;
                self.push(")");
            }
            Expr::Labeled(inner, _) => self.expr(inner)?,
        }
        Ok(())
    }

    fn predicate(&mut self, predicate: &Predicate) -> QueryResult<()> {
        match predicate {
            Predicate::True => self.push("1 = 1"),
            Predicate::Compare { left, op, right } => {
                self.expr(left)?;
                self.push(" ");
                self.push(op.sql());
                self.push(" ");
                self.expr(right)?;
            }
            Predicate::In { expr, set } => {
                self.expr(expr)?;
                self.push(" IN (");
                match set {
                    InSet::List(items) => {
                        for (index, item) in items.iter().enumerate() {
                            if index > 0 {
                                self.push(", ");
                            }
                            self.expr(item)?;
                        }
                    }
                    InSet::Subquery(select) => self.select(select)?,
                }
                self.push(")");
            }
            Predicate::IsNull(expr) => {
                self.expr(expr)?;
                self.push(" IS NULL");
            }
            Predicate::IsNotNull(expr) => {
                self.expr(expr)?;
                self.push(" IS NOT NULL");
            }
            Predicate::And(parts) => self.junction(parts, " AND ", "1 = 1")?,
            Predicate::Or(parts) => self.junction(parts, " OR ", "1 = 0")?,
            Predicate::Not(inner) => {
                self.push("NOT (");
                self.predicate(inner)?;
                self.push(")");
            }
        }
        Ok(())
    }

    fn junction(&mut self, parts: &[Predicate], separator: &str, empty: &str) -> QueryResult<()> {
        if parts.is_empty() {
            self.push(empty);
            return Ok(());
        }
        self.push("(");
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                self.push(separator);
            }
            self.predicate(part)?;
        }
        self.push(")");
        Ok(())
    }
}
