//! Use-case services.
//!
//! # Responsibility
//! - Wrap repositories and remote endpoints in screen-level operations.
//! - Keep screens decoupled from SQL and HTTP details.

pub mod preference_service;
pub mod weather;
