// ── Core error types ──
//
// A posture switch that reaches the control plane always produces a
// report, even when it fails; per-unit problems travel inside it as
// `UnitOutcome` values. `SwitchError` is reserved for problems detected
// before the first external call is made.

use thiserror::Error;

/// Errors that abort a posture switch before any control is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchError {
    /// A required identifier was absent from the switch configuration.
    #[error("missing required identifier: {name}")]
    MissingIdentifier { name: &'static str },
}
