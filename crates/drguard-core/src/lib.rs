// drguard-core: posture orchestration between drguard-api and consumers (CLI).

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod model;
pub mod toggle;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_FEATURES, SwitchConfig};
pub use control::ControlPlane;
pub use controller::PostureController;
pub use error::SwitchError;
pub use model::{ControlUnit, Overall, Posture, RequestedStatus, SwitchReport, UnitOutcome};
