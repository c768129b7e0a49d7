//! Error surface for the drguard binary.
//!
//! Every command failure funnels into [`CliError`], which carries the
//! miette diagnostics shown to the user and the process exit code.

use miette::Diagnostic;
use thiserror::Error;

use drguard_config::ConfigError;
use drguard_core::SwitchError;

/// Process exit codes, stable for scripting.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const AUTH: u8 = 3;
    pub const PRECONDITION: u8 = 4;
    pub const PARTIAL: u8 = 5;
    pub const SWITCH_FAILED: u8 = 6;
    pub const CONNECTION: u8 = 7;
    pub const TIMEOUT: u8 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Reaching the gateway ─────────────────────────────────────────

    #[error("Could not connect to the gateway")]
    #[diagnostic(
        code(drguard::unreachable),
        help(
            "The gateway did not accept a connection. Verify the URL and\n\
             network path, then retry with -v for request details."
        )
    )]
    Unreachable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS error: {reason}")]
    #[diagnostic(
        code(drguard::tls_error),
        help(
            "For a self-signed gateway certificate pass --insecure (-k),\n\
             or point ca_cert in the profile at the CA bundle."
        )
    )]
    TlsError { reason: String },

    #[error("Request to the gateway timed out")]
    #[diagnostic(
        code(drguard::timeout),
        help("Raise --timeout, or check whether the gateway is overloaded.")
    )]
    Timeout,

    // ── Credentials ──────────────────────────────────────────────────

    #[error("Authentication with the gateway failed")]
    #[diagnostic(
        code(drguard::auth_failed),
        help(
            "The gateway rejected the API token. Store a fresh one with:\n\
             drguard config set-token"
        )
    )]
    AuthFailed,

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(drguard::no_token),
        help(
            "Run 'drguard config init', or export DRGUARD_API_TOKEN\n\
             (or the variable named by the profile's api_token_env)."
        )
    )]
    NoToken { profile: String },

    // ── Posture switches ─────────────────────────────────────────────

    #[error("Missing required identifier: {name}")]
    #[diagnostic(
        code(drguard::precondition),
        help(
            "Add {name} to the active profile, or pass the matching flag\n\
             (--detector, --web-acl, --resource)."
        )
    )]
    MissingIdentifier { name: &'static str },

    #[error("Posture switch to {posture} failed")]
    #[diagnostic(
        code(drguard::switch_failed),
        help(
            "A hard step (detector or association) failed, so the steps\n\
             after it were skipped. Inspect the unit results, fix the\n\
             cause, and re-run the same command."
        )
    )]
    SwitchFailed { posture: String },

    #[error("Posture switch to {posture} partially succeeded: {failed} unit(s) failed")]
    #[diagnostic(
        code(drguard::partial),
        help("Re-run the same command to retry the failed sub-features.")
    )]
    PartialSwitch { posture: String, failed: usize },

    // ── Gateway-reported failures ────────────────────────────────────

    #[error("Gateway error ({code}): {message}")]
    #[diagnostic(code(drguard::gateway))]
    Gateway { code: String, message: String },

    // ── Input and configuration ──────────────────────────────────────

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(drguard::invalid))]
    Invalid { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(drguard::unknown_profile),
        help(
            "Known profiles: {known}\n\
             Add one with: drguard config init"
        )
    )]
    UnknownProfile { name: String, known: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(drguard::config_missing),
        help(
            "Nothing at {path}.\n\
             Run: drguard config init"
        )
    )]
    ConfigMissing { path: String },

    #[error(transparent)]
    #[diagnostic(code(drguard::config_parse))]
    ConfigParse(Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Exit code reported when this error terminates the process.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Invalid { .. } => exit::USAGE,
            Self::AuthFailed | Self::NoToken { .. } => exit::AUTH,
            Self::MissingIdentifier { .. } => exit::PRECONDITION,
            Self::PartialSwitch { .. } => exit::PARTIAL,
            Self::SwitchFailed { .. } => exit::SWITCH_FAILED,
            Self::Unreachable { .. } | Self::TlsError { .. } => exit::CONNECTION,
            Self::Timeout => exit::TIMEOUT,
            _ => exit::GENERAL,
        }
    }
}

// ── Conversions from the library crates ──────────────────────────────

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigParse(Box::new(err))
    }
}

impl From<SwitchError> for CliError {
    fn from(err: SwitchError) -> Self {
        match err {
            SwitchError::MissingIdentifier { name } => Self::MissingIdentifier { name },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Invalid { field, reason },
            ConfigError::NoToken { profile } => Self::NoToken { profile },
            ConfigError::Figment(e) => Self::ConfigParse(e),
            ConfigError::Serialization(e) => Self::Invalid {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

impl From<drguard_api::Error> for CliError {
    fn from(err: drguard_api::Error) -> Self {
        use drguard_api::Error as ApiError;

        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_auth() {
            return Self::AuthFailed;
        }

        match err {
            ApiError::Transport(e) => Self::Unreachable {
                source: Box::new(e),
            },
            ApiError::InvalidUrl(e) => Self::Invalid {
                field: "gateway".into(),
                reason: format!("invalid URL: {e}"),
            },
            ApiError::Tls(reason) => Self::TlsError { reason },
            ApiError::Gateway { message, code, .. } => Self::Gateway {
                code: code.unwrap_or_default(),
                message,
            },
            ApiError::Deserialization { message, .. } => Self::Gateway {
                code: "invalid_response".into(),
                message,
            },
            ApiError::Authentication { .. } | ApiError::InvalidToken => Self::AuthFailed,
        }
    }
}
