// ── Feature toggle executor ──
//
// Applies one status change to one named sub-feature, isolating its
// failure from siblings. Whatever happens comes back as data; this
// module never returns an error the caller must catch.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::control::ControlPlane;
use crate::model::{ControlUnit, RequestedStatus, UnitOutcome};

/// Toggle one sub-feature of the detector and report what happened.
pub async fn apply<C: ControlPlane>(
    control: &C,
    detector_id: &str,
    feature: &str,
    enable: bool,
    per_call_timeout: Duration,
) -> UnitOutcome {
    let requested = if enable {
        RequestedStatus::Enabled
    } else {
        RequestedStatus::Disabled
    };

    let outcome = execute(
        ControlUnit::feature(feature),
        requested,
        per_call_timeout,
        control.update_feature(detector_id, feature, enable),
    )
    .await;

    if outcome.success {
        debug!(feature, status = %requested, "sub-feature converged");
    } else {
        // Soft failure: siblings keep going, the report carries the details.
        warn!(
            feature,
            error = outcome.error.as_deref().unwrap_or("unknown"),
            "sub-feature toggle failed"
        );
    }

    outcome
}

/// Run one control-plane call under the per-call budget and capture the
/// result as a [`UnitOutcome`]. A timed-out call is a failed unit.
pub(crate) async fn execute<E: fmt::Display>(
    unit: ControlUnit,
    requested: RequestedStatus,
    per_call_timeout: Duration,
    call: impl Future<Output = Result<(), E>>,
) -> UnitOutcome {
    let started = Instant::now();

    match timeout(per_call_timeout, call).await {
        Ok(Ok(())) => UnitOutcome::succeeded(unit, requested, started.elapsed()),
        Ok(Err(e)) => UnitOutcome::failed(unit, requested, e.to_string(), started.elapsed()),
        Err(_) => UnitOutcome::failed(
            unit,
            requested,
            format!("timed out after {}s", per_call_timeout.as_secs()),
            started.elapsed(),
        ),
    }
}
