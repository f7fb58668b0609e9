//! Configuration structs for keel node components.
//!
//! These are plain serde types; loading them from the node's config file is
//! the host's concern.

pub mod logger;
pub mod upgrade;
