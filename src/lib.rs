//! Anti-aliased 2D path drawing onto in-memory pixel buffers.
//!
//! This crate re-exports [`inkpath_core`]; see there for the API.

pub use inkpath_core::*;
