// ── Aggregate switch report ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::unit::{Posture, UnitOutcome};

/// Aggregate verdict across all units of one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Overall {
    FullySucceeded,
    PartiallySucceeded,
    Failed,
}

impl fmt::Display for Overall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullySucceeded => write!(f, "FULLY_SUCCEEDED"),
            Self::PartiallySucceeded => write!(f, "PARTIALLY_SUCCEEDED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Aggregate result of one posture switch: the verdict plus the outcome
/// of every unit that was attempted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchReport {
    pub posture: Posture,
    #[serde(rename = "overallStatus")]
    pub overall: Overall,
    #[serde(rename = "unitResults")]
    pub units: Vec<UnitOutcome>,
    pub finished_at: DateTime<Utc>,
}

impl SwitchReport {
    /// Fold per-unit outcomes into the aggregate verdict.
    ///
    /// Any hard-unit failure fails the whole switch; soft failures alone
    /// degrade it to partial success.
    pub fn from_outcomes(posture: Posture, units: Vec<UnitOutcome>) -> Self {
        let hard_failed = units.iter().any(|u| !u.success && u.unit.is_hard());
        let soft_failed = units.iter().any(|u| !u.success && !u.unit.is_hard());

        let overall = if hard_failed {
            Overall::Failed
        } else if soft_failed {
            Overall::PartiallySucceeded
        } else {
            Overall::FullySucceeded
        };

        Self {
            posture,
            overall,
            units,
            finished_at: Utc::now(),
        }
    }

    /// Number of units that did not converge.
    pub fn failed_count(&self) -> usize {
        self.units.iter().filter(|u| !u.success).count()
    }
}
