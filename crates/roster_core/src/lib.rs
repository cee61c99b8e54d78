//! Typed query layer over a SQLite roster of members and teams.
//!
//! Queries are built as data in [`query`], executed through a
//! [`DataAccessEngine`] and decoded into entities or value objects.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::member::{Member, MemberId};
pub use model::team::{Team, TeamId};
pub use model::validation::ModelValidationError;
pub use query::{
    Condition, ConditionBuilder, Expr, ExprOps, MemberDto, MemberSearchCondition, MemberTeamDto,
    Predicate, Select, Tuple, MEMBER, TEAM,
};
pub use repo::member_repo::{DataAccessEngine, RepoError, RepoResult, SqliteMemberRepository};
pub use service::member_search::{MemberPage, MemberSearchService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
