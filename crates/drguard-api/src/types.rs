//! Wire types for the security control-plane gateway.
//!
//! All types match the JSON responses from `/v1/` endpoints.
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.

use serde::{Deserialize, Serialize};

// ── Detector ─────────────────────────────────────────────────────────

/// Threat-detection engine state — from `GET /v1/detectors/{detectorId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorStateResponse {
    pub detector_id: String,
    pub enabled: bool,
    /// Sub-feature states known to the gateway.
    #[serde(default)]
    pub features: Vec<FeatureState>,
    /// ISO 8601 date-time of the last state change.
    pub updated_at: Option<String>,
}

/// A single sub-feature of the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureState {
    pub name: String,
    /// Either `ENABLED` or `DISABLED`.
    pub status: String,
}

// ── Association ──────────────────────────────────────────────────────

/// Firewall-policy-to-endpoint binding — from `GET /v1/associations/{resourceId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationResponse {
    pub resource_id: String,
    pub web_acl_id: String,
    /// ISO 8601 date-time the binding was created.
    pub associated_at: Option<String>,
}
