use keel_types::upgrade::PlanValidationError;
use keel_types::Height;
use std::error::Error;
use std::fmt;

pub type UpgradeResult<T> = Result<T, UpgradeError>;

/// Recoverable errors, returned to whoever drives scheduling or startup
/// wiring. Nothing has been mutated when one of these comes back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpgradeError {
    /// The plan failed validation against the current height.
    InvalidPlan(PlanValidationError),

    /// A plan with this name already executed; names are single-use.
    AlreadyCompleted { name: String, completed_at: Height },

    /// A migration handler is already registered under this name. A wiring
    /// defect in the hosting application, caught at startup.
    DuplicateHandler(String),
}

impl fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeError::InvalidPlan(err) => write!(f, "Invalid upgrade plan: {err}"),
            UpgradeError::AlreadyCompleted { name, completed_at } => write!(
                f,
                "Upgrade \"{name}\" already completed at height {completed_at}"
            ),
            UpgradeError::DuplicateHandler(name) => {
                write!(f, "A migration handler for \"{name}\" is already registered")
            }
        }
    }
}

impl From<PlanValidationError> for UpgradeError {
    fn from(err: PlanValidationError) -> Self {
        UpgradeError::InvalidPlan(err)
    }
}

impl Error for UpgradeError {}

/// Terminal conditions: block processing must stop and the node must not
/// advance past the current height without operator intervention.
///
/// Deliberately a separate type from [`UpgradeError`] so a host cannot
/// accidentally treat a fatal condition as recoverable. Note that a halt is
/// *not* represented here: halting is a successful outcome of the height
/// gate, see [`BlockAction::Halted`](crate::BlockAction::Halted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FatalUpgrade {
    /// The migration handler for the named plan returned an error. The node
    /// must not proceed: peers whose handler fails differently would diverge.
    MigrationFailed {
        name: String,
        height: Height,
        message: String,
    },

    /// The gate observed a pending plan whose height is already behind the
    /// chain. Signals a missed block or a corrupted plan record; silently
    /// skipping it would desynchronize this node from the network.
    PlanHeightInPast {
        plan_height: Height,
        current_height: Height,
    },

    /// A client-state snapshot was already recorded at this height.
    /// Snapshots are write-once; a second write means the surrounding
    /// pipeline re-entered a height it already committed.
    ClientStateAlreadyRecorded(Height),
}

impl fmt::Display for FatalUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalUpgrade::MigrationFailed {
                name,
                height,
                message,
            } => write!(
                f,
                "Migration for upgrade \"{name}\" failed at height {height}: {message}"
            ),
            FatalUpgrade::PlanHeightInPast {
                plan_height,
                current_height,
            } => write!(
                f,
                "Pending upgrade height {plan_height} is behind the current height {current_height}"
            ),
            FatalUpgrade::ClientStateAlreadyRecorded(height) => write!(
                f,
                "A client-state snapshot is already recorded at height {height}"
            ),
        }
    }
}

impl Error for FatalUpgrade {}
