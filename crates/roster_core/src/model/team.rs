//! Team entity.

use crate::model::validation::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a team.
pub type TeamId = Uuid;

/// A named group members can point at.
///
/// The member list is a back-reference resolved by query
/// (`DataAccessEngine::members_of_team`), not a collection owned here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    /// Creates a team with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Checks persist-time rules.
    ///
    /// # Errors
    /// - `BlankTeamName` when `name` is empty after trimming.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankTeamName);
        }
        Ok(())
    }
}
