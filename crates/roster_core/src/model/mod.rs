//! Roster domain model.
//!
//! # Responsibility
//! - Define the `Member` and `Team` records the query layer reads and writes.
//! - Own entity-level validation rules applied on persist.
//!
//! # Invariants
//! - A member references at most one team; teams never own members.
//! - Entity ids are stable UUIDs and are never reused.

pub mod member;
pub mod team;
pub mod validation;
