//! Read-only posture view assembled from the gateway's state endpoints.

use serde::Serialize;

use drguard_api::ControlClient;

use crate::cli::{GlobalOpts, StatusArgs};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

// ── View types ──────────────────────────────────────────────────────

/// Aggregate view over the detector and the edge association.
///
/// `posture` is `active` when both sides are on, `inactive` when both
/// are off, and `mixed` for anything in between (e.g. a half-finished
/// or partially failed switch).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostureStatus {
    posture: String,
    detector: DetectorStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    association: Option<AssociationStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectorStatus {
    detector_id: String,
    enabled: bool,
    features: Vec<FeatureStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureStatus {
    name: String,
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssociationStatus {
    resource_id: String,
    web_acl_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    associated_at: Option<String>,
}

fn status_detail(status: &PostureStatus) -> String {
    let mut lines = vec![
        format!("Posture:     {}", status.posture),
        format!(
            "Detector:    {} ({})",
            status.detector.detector_id,
            if status.detector.enabled {
                "enabled"
            } else {
                "disabled"
            }
        ),
    ];
    if !status.detector.features.is_empty() {
        lines.push("Features:".into());
        for feature in &status.detector.features {
            lines.push(format!("  - {}: {}", feature.name, feature.status));
        }
    }
    match &status.association {
        Some(a) => {
            let since = a
                .associated_at
                .as_deref()
                .map(|t| format!(" (since {t})"))
                .unwrap_or_default();
            lines.push(format!(
                "Association: {} -> {}{since}",
                a.web_acl_id, a.resource_id
            ));
        }
        None => lines.push("Association: none".into()),
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ControlClient,
    profile: Option<&Profile>,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let targets = config::resolve_targets(profile, &args.target);
    let detector_id = targets.require_detector_id()?;
    let resource_id = targets.require_resource_id()?;

    let detector = client.get_detector(detector_id).await?;
    // A missing binding is a normal state (inactive posture), not an error.
    let association = match client.get_association(resource_id).await {
        Ok(a) => Some(a),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    let posture = match (detector.enabled, association.is_some()) {
        (true, true) => "active",
        (false, false) => "inactive",
        _ => "mixed",
    };

    let status = PostureStatus {
        posture: posture.into(),
        detector: DetectorStatus {
            detector_id: detector.detector_id,
            enabled: detector.enabled,
            features: detector
                .features
                .into_iter()
                .map(|f| FeatureStatus {
                    name: f.name,
                    status: f.status,
                })
                .collect(),
        },
        association: association.map(|a| AssociationStatus {
            resource_id: a.resource_id,
            web_acl_id: a.web_acl_id,
            associated_at: a.associated_at,
        }),
    };

    let rendered =
        output::render_view(&global.output, &status, status_detail, |s| s.posture.clone());
    output::emit(&rendered, global.quiet);
    Ok(())
}
