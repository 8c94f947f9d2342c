//! Screen-facing domain records.
//!
//! # Responsibility
//! - Define the read-only projections the screens render.
//! - Keep every record screen-local; nothing here is shared across screens.
//!
//! # Invariants
//! - Only the emergency number outlives a screen mount (via storage).

pub mod contact;
pub mod environment;
pub mod notification;
pub mod scan;
