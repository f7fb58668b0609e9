//! The replicated key-value store seam.
//!
//! The store engine underneath is an external collaborator; components only
//! see these two traits.

/// Read access to the replicated state as of the block being processed.
pub trait StateReader {
    /// Returns the value stored at `key`, if any.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Iterates over all entries whose key starts with `prefix`, in
    /// ascending key order.
    fn prefix_iter<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;
}

/// Write access to the replicated state.
///
/// All mutations performed during a single begin-of-block call become durable
/// atomically when the host commits the block; if the process crashes before
/// the commit, none of them survive. Components therefore never observe a
/// partially applied block: "migration handler ran but the plan record was
/// not cleared" is not a reachable state.
pub trait StateStore: StateReader {
    /// Stores `value` at `key`, replacing any previous value.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);

    /// Removes the entry at `key`, if present.
    fn delete(&mut self, key: &[u8]);
}
