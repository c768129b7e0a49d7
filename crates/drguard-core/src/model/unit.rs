// ── Posture, unit identity, and per-unit outcomes ──

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

// ── Posture ─────────────────────────────────────────────────────────

/// Target aggregate posture for the managed security controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Active,
    Inactive,
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

// ── ControlUnit ─────────────────────────────────────────────────────

/// One externally managed control touched by a switch.
///
/// The kind decides the failure policy: detector and association are
/// hard units, sub-features are soft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlUnit {
    /// The coarse-grained threat-detection engine.
    Detector { detector_id: String },
    /// One named sub-feature of the detector.
    Feature { name: String },
    /// The firewall-policy-to-endpoint binding. The policy is unknown
    /// when removing a binding by endpoint alone.
    Association {
        web_acl_id: Option<String>,
        resource_id: String,
    },
}

impl ControlUnit {
    pub fn detector(detector_id: impl Into<String>) -> Self {
        Self::Detector {
            detector_id: detector_id.into(),
        }
    }

    pub fn feature(name: impl Into<String>) -> Self {
        Self::Feature { name: name.into() }
    }

    pub fn association(web_acl_id: Option<&str>, resource_id: &str) -> Self {
        Self::Association {
            web_acl_id: web_acl_id.map(str::to_owned),
            resource_id: resource_id.to_owned(),
        }
    }

    /// Hard units fail the whole switch; soft units only degrade it.
    pub fn is_hard(&self) -> bool {
        !matches!(self, Self::Feature { .. })
    }
}

impl fmt::Display for ControlUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detector { detector_id } => write!(f, "Detector({detector_id})"),
            Self::Feature { name } => write!(f, "Feature({name})"),
            Self::Association {
                web_acl_id: Some(acl),
                resource_id,
            } => write!(f, "Association({acl},{resource_id})"),
            Self::Association {
                web_acl_id: None,
                resource_id,
            } => write!(f, "Association({resource_id})"),
        }
    }
}

impl Serialize for ControlUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── RequestedStatus ─────────────────────────────────────────────────

/// The state a unit was asked to converge to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestedStatus {
    Enabled,
    Disabled,
    Associated,
    Disassociated,
}

impl fmt::Display for RequestedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "ENABLED"),
            Self::Disabled => write!(f, "DISABLED"),
            Self::Associated => write!(f, "ASSOCIATED"),
            Self::Disassociated => write!(f, "DISASSOCIATED"),
        }
    }
}

// ── UnitOutcome ─────────────────────────────────────────────────────

/// Result of one unit's transition attempt.
///
/// Failures are first-class data here, not raised errors; the report
/// always enumerates every attempted unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOutcome {
    pub unit: ControlUnit,
    #[serde(rename = "requestedStatus")]
    pub requested: RequestedStatus,
    pub success: bool,
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl UnitOutcome {
    pub fn succeeded(unit: ControlUnit, requested: RequestedStatus, duration: Duration) -> Self {
        Self {
            unit,
            requested,
            success: true,
            error: None,
            duration_ms: as_millis(duration),
        }
    }

    pub fn failed(
        unit: ControlUnit,
        requested: RequestedStatus,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            unit,
            requested,
            success: false,
            error: Some(error.into()),
            duration_ms: as_millis(duration),
        }
    }
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
