//! Typed query construction over the roster schema.
//!
//! # Responsibility
//! - Model select, update and delete statements as plain data (AST).
//! - Compose optional filters into one predicate (`condition`).
//! - Lower statements to parameterized SQLite SQL (`sql`).
//! - Map result tuples into value objects (`projection`).
//!
//! # Invariants
//! - Nothing in this module touches a connection; execution belongs to
//!   `repo::member_repo`.
//! - User-supplied values only ever reach SQL as bind parameters.

pub mod condition;
pub mod error;
pub mod expr;
pub mod mutation;
pub mod path;
pub mod predicate;
pub mod projection;
pub mod select;
pub mod sql;
pub mod tuple;

pub use condition::{
    age_eq, age_goe, age_loe, all_of, has_text, team_name_eq, username_eq, Condition,
    ConditionBuilder, MemberSearchCondition,
};
pub use error::{QueryError, QueryResult};
pub use expr::{AggregateFn, ArithmeticOp, CaseBuilder, CaseWhen, Expr, ExprOps};
pub use mutation::{Assignment, BulkDelete, BulkUpdate};
pub use path::{Column, MemberPath, Relation, Source, Table, TeamPath, MEMBER, TEAM};
pub use predicate::{CompareOp, InSet, Predicate};
pub use projection::{assemble, FromTuple, MemberDto, MemberTeamDto};
pub use select::{Direction, Join, JoinKind, NullOrdering, Order, Select};
pub use sql::SqlStatement;
pub use tuple::{FromValue, Tuple};
