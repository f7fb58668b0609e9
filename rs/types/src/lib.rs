//! This crate contains the types that more than one keel component crate
//! depends upon. Types used by a single component belong in that component's
//! crate, not here.

pub mod time;
pub mod upgrade;

pub use crate::time::Time;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The block height.
///
/// Heights are assigned by the block pipeline; the first block of a chain has
/// height 1. Height 0 only ever appears as the "no height" sentinel in query
/// responses.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Height(u64);

impl Height {
    pub const fn new(height: u64) -> Self {
        Height(height)
    }

    /// Returns the raw height.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The height of the next block.
    pub fn increment(self) -> Self {
        Height(self.0.checked_add(1).expect("height overflow"))
    }
}

impl From<u64> for Height {
    fn from(height: u64) -> Self {
        Height(height)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
