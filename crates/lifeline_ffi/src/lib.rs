//! Flutter-facing bindings for `lifeline_core`.

pub mod api;
