use serde::{Deserialize, Serialize};
use slog::Level;
use std::path::PathBuf;

/// The required log level, as named in config files.
//
// `slog::Level` does not provide an implementation of `Deserialize`, so we
// use the approach for remote derives (https://serde.rs/remote-derive.html)
// provided by serde.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(remote = "Level")]
#[serde(rename_all = "snake_case")]
pub enum LevelDef {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

/// Where log lines are written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

fn default_log_target() -> LogTarget {
    LogTarget::Stdout
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(with = "LevelDef")]
    pub level: Level,
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Messages are logged asynchronously, sent over an MPSC channel to the
    /// drain thread. If set to `false`, the logging thread drops messages
    /// instead of blocking when that queue is full.
    pub block_on_overflow: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Info,
            target: default_log_target(),
            block_on_overflow: true,
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
    }

    #[test]
    fn level_names_are_snake_case() {
        let config: Config = serde_json::from_str(r#"{"level":"warning"}"#).unwrap();
        assert_eq!(config.level, Level::Warning);
    }

    #[test]
    fn file_target_roundtrips() {
        let config = Config {
            target: LogTarget::File(PathBuf::from("/var/log/keel/node.log")),
            ..Config::default()
        };
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: Config = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }
}
