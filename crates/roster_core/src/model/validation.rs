use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entity rule violation detected before a write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    BlankTeamName,
    NegativeAge(i64),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTeamName => write!(f, "team name must not be blank"),
            Self::NegativeAge(age) => write!(f, "member age must be >= 0, got {age}"),
        }
    }
}

impl Error for ModelValidationError {}
