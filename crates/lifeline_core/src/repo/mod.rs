//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Return semantic errors alongside transport errors.

pub mod preference_repo;
