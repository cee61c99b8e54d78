//! Data-access engine over SQLite.
//!
//! # Responsibility
//! - Execute query/bulk statements built in `crate::query`.
//! - Keep a persistence context (identity map) of loaded members.
//!
//! # Invariants
//! - Entity writes validate before SQL runs.
//! - Bulk statements never touch the persistence context; callers must
//!   `invalidate_cache()` before trusting entities loaded earlier.

pub mod context;
pub mod member_repo;
