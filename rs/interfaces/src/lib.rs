//! Traits at the seams between keel components and the host application.
//!
//! Everything here is implemented by the host (the block pipeline, the state
//! store engine) and consumed by component crates; the traits pin down
//! exactly what those collaborators must provide.

pub mod state_store;
pub mod upgrade;
