//! Types describing a scheduled software upgrade.

use crate::Height;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-component version bookkeeping, keyed by component name.
///
/// A `BTreeMap` so that iteration order is deterministic across nodes.
pub type VersionMap = BTreeMap<String, u64>;

/// A named, height-targeted description of a pending protocol change.
///
/// The JSON encoding of this struct (fields `name`, `height`, `info`) is also
/// the format of the on-disk halt marker consumed by the external process
/// manager.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Identifier used to look up the migration handler. A name can execute
    /// at most once over the lifetime of the chain.
    pub name: String,
    /// The block height at which the upgrade executes.
    pub height: Height,
    /// Free-form description forwarded to the process manager as a hint; not
    /// interpreted by the engine.
    #[serde(default)]
    pub info: String,
}

impl Plan {
    /// Checks the plan's standalone well-formedness. Whether the height is
    /// actually in the future is checked at scheduling time, where the
    /// current height is known.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.name.is_empty() {
            return Err(PlanValidationError::EmptyName);
        }
        if self.height.get() == 0 {
            return Err(PlanValidationError::ZeroHeight);
        }
        Ok(())
    }

    /// True iff the plan is due exactly at `height`.
    pub fn should_execute(&self, height: Height) -> bool {
        self.height == height
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" at height {}", self.name, self.height)
    }
}

/// Why a plan was rejected by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanValidationError {
    #[error("upgrade plan name cannot be empty")]
    EmptyName,
    #[error("upgrade plan height must be greater than zero")]
    ZeroHeight,
    #[error("upgrade plan height {plan_height} is not after the current height {current_height}")]
    HeightNotInFuture {
        plan_height: Height,
        current_height: Height,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(name: &str, height: u64) -> Plan {
        Plan {
            name: name.to_string(),
            height: Height::new(height),
            info: String::new(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_plan() {
        assert_eq!(plan("v2", 100).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert_eq!(plan("", 100).validate(), Err(PlanValidationError::EmptyName));
    }

    #[test]
    fn validate_rejects_zero_height() {
        assert_eq!(plan("v2", 0).validate(), Err(PlanValidationError::ZeroHeight));
    }

    #[test]
    fn should_execute_only_at_exact_height() {
        let p = plan("v2", 100);
        assert!(!p.should_execute(Height::new(99)));
        assert!(p.should_execute(Height::new(100)));
        assert!(!p.should_execute(Height::new(101)));
    }

    // The field names below are a contract with the external process
    // manager; renaming them breaks marker parsing after a halt.
    #[test]
    fn plan_json_field_names() {
        let p = Plan {
            name: "v2".to_string(),
            height: Height::new(100),
            info: "release notes".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"name":"v2","height":100,"info":"release notes"}"#
        );
    }

    #[test]
    fn plan_json_info_defaults_to_empty() {
        let p: Plan = serde_json::from_str(r#"{"name":"v2","height":100}"#).unwrap();
        assert_eq!(p.info, "");
    }
}
