//! Configuration types for the scheduling passes.

use std::fmt;
use std::str::FromStr;

use crate::error::SchedulingError;

/// How the list scheduler orders ready nodes competing for the same kind of unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Ascending node id, the same order the ASAP pass uses.
    #[default]
    NodeOrder,
    /// Ascending mobility, node id breaking equal mobility.
    LeastMobility,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::NodeOrder => "node_order",
            TieBreak::LeastMobility => "least_mobility",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node_order" => Ok(TieBreak::NodeOrder),
            "least_mobility" => Ok(TieBreak::LeastMobility),
            other => Err(SchedulingError::UnknownTieBreak(other.to_string())),
        }
    }
}

/// Configuration shared by every scheduling pass.
#[derive(Clone, Debug)]
pub struct SchedulingConfig {
    /// Ordering policy for the list scheduler.
    pub tie_break: TieBreak,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Whether the list scheduler records a per-cycle trace.
    pub record_trace: bool,
    /// Upper limit on the number of nodes accepted (None = unlimited).
    pub max_nodes: Option<usize>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::NodeOrder,
            verbosity: 0,
            record_trace: true,
            max_nodes: None,
        }
    }
}

impl SchedulingConfig {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}
