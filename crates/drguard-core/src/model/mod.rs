// ── Posture domain model ──
//
// Canonical representations of the controls a switch touches and the
// outcomes it produces. Consumers (CLI, tests) depend on these, never
// on gateway wire shapes.

pub mod report;
pub mod unit;

// ── Re-exports ──────────────────────────────────────────────────────

pub use report::{Overall, SwitchReport};
pub use unit::{ControlUnit, Posture, RequestedStatus, UnitOutcome};
