//! Block time as supplied by the block pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time as nanoseconds since the UNIX epoch.
///
/// The value is taken from the block being processed, never from the local
/// clock, so it is identical on every node.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Time(u64);

impl Time {
    pub const fn from_nanos_since_unix_epoch(nanos: u64) -> Self {
        Time(nanos)
    }

    pub const fn as_nanos_since_unix_epoch(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}
