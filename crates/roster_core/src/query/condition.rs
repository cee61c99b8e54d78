//! Optional-parameter filters.
//!
//! # Responsibility
//! - Turn optional search inputs into [`Condition`]s, one per input.
//! - Fold constrained conditions into a single AND predicate.
//!
//! # Invariants
//! - An absent input never constrains the result ("match all"), it never
//!   turns into "match nothing".
//! - Strings count as absent when `None` or blank; numbers only when `None`.
//!   Zero is a real value.

use crate::query::expr::ExprOps;
use crate::query::path::{MemberPath, TeamPath};
use crate::query::predicate::Predicate;
use serde::{Deserialize, Serialize};

/// A filter contribution that may be intentionally empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Filter(Predicate),
    /// Input was absent; contributes nothing.
    Unconstrained,
}

impl Condition {
    /// Builds a filter from `value` when present.
    pub fn when<T>(value: Option<T>, build: impl FnOnce(T) -> Predicate) -> Self {
        value.map_or(Self::Unconstrained, |value| Self::Filter(build(value)))
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::Unconstrained)
    }

    pub fn into_predicate(self) -> Option<Predicate> {
        match self {
            Self::Filter(predicate) => Some(predicate),
            Self::Unconstrained => None,
        }
    }

    /// AND of two conditions, unconstrained only when both are.
    pub fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Self::Unconstrained, rhs) => rhs,
            (lhs, Self::Unconstrained) => lhs,
            (Self::Filter(lhs), Self::Filter(rhs)) => Self::Filter(lhs.and(rhs)),
        }
    }
}

impl From<Predicate> for Condition {
    fn from(value: Predicate) -> Self {
        Self::Filter(value)
    }
}

/// Returns `value` when it contains a non-whitespace character.
pub fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn username_eq(member: MemberPath, username: Option<&str>) -> Condition {
    Condition::when(has_text(username), |name| member.username().eq(name))
}

pub fn team_name_eq(team: TeamPath, name: Option<&str>) -> Condition {
    Condition::when(has_text(name), |name| team.name().eq(name))
}

pub fn age_eq(member: MemberPath, age: Option<i64>) -> Condition {
    Condition::when(age, |age| member.age().eq(age))
}

pub fn age_goe(member: MemberPath, age: Option<i64>) -> Condition {
    Condition::when(age, |age| member.age().goe(age))
}

pub fn age_loe(member: MemberPath, age: Option<i64>) -> Condition {
    Condition::when(age, |age| member.age().loe(age))
}

/// AND of every constrained condition; `Predicate::True` when none is.
pub fn all_of(conditions: impl IntoIterator<Item = Condition>) -> Predicate {
    Predicate::all(conditions.into_iter().filter_map(Condition::into_predicate))
}

/// Incremental AND/OR accumulator for filters assembled step by step.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBuilder {
    predicate: Predicate,
}

impl Default for ConditionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self {
            predicate: Predicate::True,
        }
    }

    pub fn and(&mut self, condition: Condition) -> &mut Self {
        if let Some(predicate) = condition.into_predicate() {
            let current = std::mem::replace(&mut self.predicate, Predicate::True);
            self.predicate = current.and(predicate);
        }
        self
    }

    /// OR with the accumulated filter. On an empty builder this simply sets
    /// the filter, so "nothing OR x" is `x` rather than "match all".
    pub fn or(&mut self, condition: Condition) -> &mut Self {
        if let Some(predicate) = condition.into_predicate() {
            let current = std::mem::replace(&mut self.predicate, Predicate::True);
            self.predicate = if current.is_true() {
                predicate
            } else {
                current.or(predicate)
            };
        }
        self
    }

    /// Whether any constrained condition has been added.
    pub fn has_value(&self) -> bool {
        !self.predicate.is_true()
    }

    pub fn build(&self) -> Predicate {
        self.predicate.clone()
    }
}

/// Member search inputs, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i64>,
    pub age_loe: Option<i64>,
}

impl MemberSearchCondition {
    pub fn conditions(&self, member: MemberPath, team: TeamPath) -> [Condition; 4] {
        [
            username_eq(member, self.username.as_deref()),
            team_name_eq(team, self.team_name.as_deref()),
            age_goe(member, self.age_goe),
            age_loe(member, self.age_loe),
        ]
    }

    pub fn to_predicate(&self, member: MemberPath, team: TeamPath) -> Predicate {
        all_of(self.conditions(member, team))
    }
}
