//! Value objects assembled from result tuples.
//!
//! Assembly is an explicit constructor call per row ([`FromTuple`]); the
//! projection list that feeds it lives next to the type so both stay in
//! step.

use crate::model::member::MemberId;
use crate::model::team::TeamId;
use crate::query::error::QueryResult;
use crate::query::expr::{Expr, ExprOps};
use crate::query::path::{MemberPath, TeamPath};
use crate::query::tuple::Tuple;
use serde::{Deserialize, Serialize};

/// Builds a value from one positional row.
pub trait FromTuple: Sized {
    fn from_tuple(tuple: &Tuple) -> QueryResult<Self>;
}

/// Assembles every tuple, failing on the first row that does not decode.
pub fn assemble<T: FromTuple>(tuples: &[Tuple]) -> QueryResult<Vec<T>> {
    tuples.iter().map(T::from_tuple).collect()
}

/// `{ username, age }` read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i64,
}

impl MemberDto {
    pub fn new(username: Option<String>, age: i64) -> Self {
        Self { username, age }
    }

    /// `username, age`, labelled so rows can also be read by name.
    pub fn projection(member: MemberPath) -> Vec<Expr> {
        vec![
            member.username().as_label("username"),
            member.age().as_label("age"),
        ]
    }

    /// Name-based assembly; column order does not matter.
    pub fn from_labeled(tuple: &Tuple) -> QueryResult<Self> {
        Ok(Self::new(
            tuple.get_named("username")?,
            tuple.get_named("age")?,
        ))
    }
}

impl FromTuple for MemberDto {
    fn from_tuple(tuple: &Tuple) -> QueryResult<Self> {
        Ok(Self::new(tuple.get(0)?, tuple.get(1)?))
    }
}

/// Member row flattened with its (optional) team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTeamDto {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i64,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

impl MemberTeamDto {
    pub fn projection(member: MemberPath, team: TeamPath) -> Vec<Expr> {
        vec![
            member.id().expr(),
            member.username().expr(),
            member.age().expr(),
            team.id().expr(),
            team.name().expr(),
        ]
    }
}

impl FromTuple for MemberTeamDto {
    fn from_tuple(tuple: &Tuple) -> QueryResult<Self> {
        Ok(Self {
            member_id: tuple.get(0)?,
            username: tuple.get(1)?,
            age: tuple.get(2)?,
            team_id: tuple.get(3)?,
            team_name: tuple.get(4)?,
        })
    }
}
