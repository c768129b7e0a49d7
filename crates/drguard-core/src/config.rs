// ── Switch configuration ──
//
// Identifies the external controls one posture switch drives. The caller
// resolves these from CLI flags, environment, and profile before the
// controller runs; the controller itself holds no ambient state.

use std::time::Duration;

use crate::error::SwitchError;

/// Sub-features toggled when the configuration names none.
pub const DEFAULT_FEATURES: [&str; 3] = [
    "EKS_RUNTIME_MONITORING",
    "RDS_LOGIN_EVENTS",
    "ECS_RUNTIME_MONITORING",
];

/// Default budget for a single control-plane call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything one posture switch needs to know.
///
/// Identifier fields stay optional because they arrive from layered
/// configuration; [`switch`](crate::controller::PostureController::switch)
/// checks the ones the requested direction needs before any external
/// call is made.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Threat-detection engine to drive.
    pub detector_id: Option<String>,
    /// Firewall policy to bind on activation.
    pub web_acl_id: Option<String>,
    /// Protected endpoint the policy binds to.
    pub resource_id: Option<String>,
    /// Detector sub-features toggled alongside the detector.
    pub features: Vec<String>,
    /// Budget for each individual control-plane call.
    pub per_call_timeout: Duration,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            detector_id: None,
            web_acl_id: None,
            resource_id: None,
            features: DEFAULT_FEATURES.iter().map(|f| (*f).to_owned()).collect(),
            per_call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl SwitchConfig {
    pub fn require_detector_id(&self) -> Result<&str, SwitchError> {
        Self::require(self.detector_id.as_deref(), "detector_id")
    }

    pub fn require_web_acl_id(&self) -> Result<&str, SwitchError> {
        Self::require(self.web_acl_id.as_deref(), "web_acl_id")
    }

    pub fn require_resource_id(&self) -> Result<&str, SwitchError> {
        Self::require(self.resource_id.as_deref(), "resource_id")
    }

    fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SwitchError> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(SwitchError::MissingIdentifier { name }),
        }
    }
}
