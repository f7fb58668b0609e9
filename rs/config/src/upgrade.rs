use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Operator-supplied settings of the upgrade coordinator, fixed for the
/// lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the halt marker is written to. The external process manager
    /// reads the marker from here after the node stopped for an upgrade.
    pub upgrade_info_dir: PathBuf,
    /// Heights the gate may pass without a registered handler and without
    /// halting. An operator override for moving a network past a
    /// historically broken plan; empty in normal operation.
    pub skip_heights: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upgrade_info_dir: PathBuf::from("data/upgrade"),
            skip_heights: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.skip_heights.is_empty());
    }

    #[test]
    fn skip_heights_roundtrip() {
        let config: Config =
            serde_json::from_str(r#"{"skip_heights":[100,250000]}"#).unwrap();
        assert_eq!(config.skip_heights, vec![100, 250000]);
    }
}
