//! Member entity.
//!
//! # Invariants
//! - `team_id`, when set, names an existing team (enforced by the schema).
//! - `age` is non-negative for persisted members; bulk statements are not
//!   re-validated.

use crate::model::team::{Team, TeamId};
use crate::model::validation::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a member.
pub type MemberId = Uuid;

/// A roster member with an optional team reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Nullable in storage; sorting places it according to the query.
    pub username: Option<String>,
    pub age: i64,
    pub team_id: Option<TeamId>,
}

impl Member {
    /// Creates a member with a generated id, optionally attached to `team`.
    pub fn new(username: Option<&str>, age: i64, team: Option<&Team>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.map(str::to_string),
            age,
            team_id: team.map(|team| team.id),
        }
    }

    /// Creates a teamless member with age `0`.
    pub fn named(username: &str) -> Self {
        Self::new(Some(username), 0, None)
    }

    /// Re-points this member at `team`.
    pub fn change_team(&mut self, team: &Team) {
        self.team_id = Some(team.id);
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.age < 0 {
            return Err(ModelValidationError::NegativeAge(self.age));
        }
        Ok(())
    }
}
