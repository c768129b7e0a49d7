// ── Posture controller ──
//
// Drives a full posture switch across the detector, its sub-features,
// and the edge association: direction-dependent ordering, the
// hard-vs-soft failure policy, and the aggregate report.

use futures_util::future::join_all;
use tracing::{error, info};

use crate::config::SwitchConfig;
use crate::control::ControlPlane;
use crate::error::SwitchError;
use crate::model::{ControlUnit, Posture, RequestedStatus, SwitchReport, UnitOutcome};
use crate::toggle;

/// Orchestrates one posture switch against a [`ControlPlane`].
///
/// Holds no ambient state: identity and tuning arrive through
/// [`SwitchConfig`], side effects leave only through the control plane.
pub struct PostureController<C> {
    control: C,
    config: SwitchConfig,
}

impl<C: ControlPlane> PostureController<C> {
    pub fn new(control: C, config: SwitchConfig) -> Self {
        Self { control, config }
    }

    /// The switch configuration this controller was built with.
    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Converge every managed control onto `posture`.
    ///
    /// Returns `Err` only for precondition failures detected before the
    /// first external call. Everything after that point comes back inside
    /// the report, hard failures included (`overall` turns to `Failed`).
    pub async fn switch(&self, posture: Posture) -> Result<SwitchReport, SwitchError> {
        let detector_id = self.config.require_detector_id()?;
        let resource_id = self.config.require_resource_id()?;

        info!(%posture, detector_id, "starting posture switch");

        let units = match posture {
            Posture::Active => {
                let web_acl_id = self.config.require_web_acl_id()?;
                self.activate(detector_id, web_acl_id, resource_id).await
            }
            Posture::Inactive => self.deactivate(detector_id, resource_id).await,
        };

        let report = SwitchReport::from_outcomes(posture, units);
        info!(
            overall = %report.overall,
            units = report.units.len(),
            failed = report.failed_count(),
            "posture switch finished"
        );
        Ok(report)
    }

    /// Active direction: detector on, then sub-features, then the edge
    /// association. The association runs only after the detector enable
    /// succeeded.
    async fn activate(
        &self,
        detector_id: &str,
        web_acl_id: &str,
        resource_id: &str,
    ) -> Vec<UnitOutcome> {
        let mut units = Vec::with_capacity(self.config.features.len() + 2);

        let detector = toggle::execute(
            ControlUnit::detector(detector_id),
            RequestedStatus::Enabled,
            self.config.per_call_timeout,
            self.control.update_detector(detector_id, true),
        )
        .await;
        let detector_ok = detector.success;
        if let Some(err) = detector.error.as_deref() {
            error!(detector_id, error = err, "detector enable failed");
        }
        units.push(detector);

        if !detector_ok {
            // Hard failure: remaining steps are skipped, outcomes so far stand.
            return units;
        }

        units.extend(self.toggle_features(detector_id, true).await);

        let association = toggle::execute(
            ControlUnit::association(Some(web_acl_id), resource_id),
            RequestedStatus::Associated,
            self.config.per_call_timeout,
            self.control.associate(resource_id, web_acl_id),
        )
        .await;
        if let Some(err) = association.error.as_deref() {
            error!(resource_id, error = err, "association failed");
        }
        units.push(association);

        units
    }

    /// Inactive direction: sub-features first, while the detector still
    /// accepts feature calls, then detector off, then the association
    /// removal. A detector failure halts the removal.
    async fn deactivate(&self, detector_id: &str, resource_id: &str) -> Vec<UnitOutcome> {
        let mut units = Vec::with_capacity(self.config.features.len() + 2);

        units.extend(self.toggle_features(detector_id, false).await);

        let detector = toggle::execute(
            ControlUnit::detector(detector_id),
            RequestedStatus::Disabled,
            self.config.per_call_timeout,
            self.control.update_detector(detector_id, false),
        )
        .await;
        let detector_ok = detector.success;
        if let Some(err) = detector.error.as_deref() {
            error!(detector_id, error = err, "detector disable failed");
        }
        units.push(detector);

        if !detector_ok {
            return units;
        }

        // Removal is keyed by the endpoint alone; the unit identity must
        // not claim a specific policy was unbound.
        let association = toggle::execute(
            ControlUnit::association(None, resource_id),
            RequestedStatus::Disassociated,
            self.config.per_call_timeout,
            self.control.disassociate(resource_id),
        )
        .await;
        if let Some(err) = association.error.as_deref() {
            error!(resource_id, error = err, "disassociation failed");
        }
        units.push(association);

        units
    }

    /// Toggle every configured sub-feature, concurrently and
    /// independently. Outcome order follows configuration order.
    async fn toggle_features(&self, detector_id: &str, enable: bool) -> Vec<UnitOutcome> {
        let toggles = self.config.features.iter().map(|feature| {
            toggle::apply(
                &self.control,
                detector_id,
                feature,
                enable,
                self.config.per_call_timeout,
            )
        });
        join_all(toggles).await
    }
}
