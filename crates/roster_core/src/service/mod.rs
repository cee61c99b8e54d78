//! Use-case services over the data-access engine.
//!
//! # Responsibility
//! - Turn optional search inputs into queries.
//! - Keep callers unaware of statement construction details.

pub mod member_search;
