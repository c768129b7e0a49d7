use thiserror::Error;

/// Code the gateway attaches to mutations that would leave a control in
/// the state it is already in. The client treats it as success.
pub const ALREADY_IN_REQUESTED_STATE: &str = "ALREADY_IN_REQUESTED_STATE";

/// Everything a control-plane call can fail with.
///
/// `drguard-core` turns these into unit outcomes; the CLI turns them
/// into diagnostics and exit codes.
#[derive(Debug, Error)]
pub enum Error {
    /// The token could not be installed as a request header.
    #[error("Could not prepare credentials: {message}")]
    Authentication { message: String },

    /// The gateway answered 401 for the presented token.
    #[error("Invalid API token")]
    InvalidToken,

    /// Connection-level failure: refused, DNS, timeout, broken pipe.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// CA bundle or client construction problems, before any request.
    #[error("TLS failure: {0}")]
    Tls(String),

    /// Non-2xx answer, decoded from the `{message, code}` envelope when
    /// the gateway sent one.
    #[error("Gateway rejected the request (HTTP {status}): {message}")]
    Gateway {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// 2xx answer whose body did not match the expected shape. Carries
    /// the raw body for debugging.
    #[error("Unexpected response body: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidToken | Self::Gateway { status: 403, .. }
        )
    }

    /// Worth retrying later without changing anything.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Gateway { status, .. } => *status == 429 || *status >= 500,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The transport layer gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The target control does not exist on the gateway.
    pub fn is_not_found(&self) -> bool {
        if let Self::Gateway { status: 404, .. } = self {
            return true;
        }
        matches!(self, Self::Transport(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND))
    }

    /// The gateway says the control is already in the requested state.
    /// Mutating verbs normalize this to success.
    pub fn is_already_in_requested_state(&self) -> bool {
        matches!(
            self,
            Self::Gateway { code: Some(code), .. } if code == ALREADY_IN_REQUESTED_STATE
        )
    }

    /// Machine-readable error code from the gateway envelope, if any.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Gateway { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
