use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QueryResult<T> = Result<T, QueryError>;

/// Statement shape or result decoding problem detected without the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `select` without any projected expression.
    EmptyProjection,
    /// `select` without a `from` source.
    MissingSource,
    /// Join target does not match the table the relation points at.
    RelationMismatch {
        relation: &'static str,
        target: &'static str,
    },
    /// Bulk update without any `set` clause.
    NoAssignments,
    /// Bulk statement touches a column outside its target alias.
    ForeignColumn {
        column: String,
        target: &'static str,
    },
    /// Projection does not have the shape the fetch method decodes.
    UnexpectedProjection(&'static str),
    ColumnOutOfRange {
        index: usize,
        len: usize,
    },
    UnknownLabel(String),
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProjection => write!(f, "select has no projected expressions"),
            Self::MissingSource => write!(f, "select has no from source"),
            Self::RelationMismatch { relation, target } => {
                write!(f, "relation `{relation}` cannot join table `{target}`")
            }
            Self::NoAssignments => write!(f, "bulk update has no assignments"),
            Self::ForeignColumn { column, target } => {
                write!(f, "column `{column}` does not belong to bulk target `{target}`")
            }
            Self::UnexpectedProjection(expected) => {
                write!(f, "projection does not match expected shape: {expected}")
            }
            Self::ColumnOutOfRange { index, len } => {
                write!(f, "tuple index {index} out of range for {len} columns")
            }
            Self::UnknownLabel(label) => write!(f, "tuple has no column labelled `{label}`"),
            Self::TypeMismatch {
                index,
                expected,
                found,
            } => write!(f, "tuple column {index}: expected {expected}, found {found}"),
        }
    }
}

impl Error for QueryError {}
