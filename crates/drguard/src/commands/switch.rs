//! Posture switch handlers (activate / deactivate).

use owo_colors::OwoColorize;
use tabled::Tabled;

use drguard_api::ControlClient;
use drguard_core::{Overall, Posture, PostureController, SwitchReport, UnitOutcome};

use crate::cli::{GlobalOpts, SwitchArgs};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

// ── Unit result table row ───────────────────────────────────────────

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Requested")]
    requested: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl UnitRow {
    fn from_outcome(outcome: &UnitOutcome, color: bool) -> Self {
        let result = match (outcome.success, color) {
            (true, true) => "ok".green().to_string(),
            (true, false) => "ok".into(),
            (false, true) => "failed".red().to_string(),
            (false, false) => "failed".into(),
        };
        Self {
            unit: outcome.unit.to_string(),
            requested: outcome.requested.to_string(),
            result,
            duration: format!("{}ms", outcome.duration_ms),
            error: outcome.error.clone().unwrap_or_default(),
        }
    }
}

fn report_detail(report: &SwitchReport, color: bool) -> String {
    let rows: Vec<UnitRow> = report
        .units
        .iter()
        .map(|u| UnitRow::from_outcome(u, color))
        .collect();
    [
        format!("Posture:  {}", report.posture),
        format!("Overall:  {}", report.overall),
        format!(
            "Finished: {}",
            report
                .finished_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        ),
        String::new(),
        output::rows_table(&rows),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ControlClient,
    profile: Option<&Profile>,
    args: SwitchArgs,
    posture: Posture,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let switch_config = config::resolve_switch_config(profile, &args);

    // The prompt names the detector, so its identifier is checked up
    // front; the remaining identifiers are checked by the controller.
    let detector_id = switch_config.require_detector_id()?.to_owned();
    let verb = match posture {
        Posture::Active => "Activate",
        Posture::Inactive => "Deactivate",
    };
    if !super::confirm(
        &format!("{verb} security posture for detector {detector_id}?"),
        global.yes,
    )? {
        return Ok(());
    }

    let controller = PostureController::new(client, switch_config);
    let report = controller.switch(posture).await?;

    let color = output::color_enabled(&global.color);
    let rendered = output::render_view(
        &global.output,
        &report,
        |r| report_detail(r, color),
        |r| r.overall.to_string(),
    );
    output::emit(&rendered, global.quiet);

    match report.overall {
        Overall::FullySucceeded => Ok(()),
        Overall::PartiallySucceeded => Err(CliError::PartialSwitch {
            posture: posture.to_string(),
            failed: report.failed_count(),
        }),
        Overall::Failed => Err(CliError::SwitchFailed {
            posture: posture.to_string(),
        }),
    }
}
