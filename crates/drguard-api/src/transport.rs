// How drguard talks to the gateway: TLS trust and request timeout.
//
// The CLI folds its flags into one Transport before the client is
// built, so every request shares the same reqwest::Client.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings shared by every request the client makes.
#[derive(Debug, Clone)]
pub struct Transport {
    pub tls: TlsPolicy,
    pub timeout: Duration,
}

/// How the gateway's TLS certificate is checked.
#[derive(Debug, Clone)]
pub enum TlsPolicy {
    /// Trust the system certificate store.
    SystemRoots,
    /// Trust one CA bundle (PEM file) instead.
    PinnedCa(PathBuf),
    /// Skip verification entirely (lab gateways behind self-signed proxies).
    NoVerify,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            tls: TlsPolicy::SystemRoots,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Transport {
    /// Build the `reqwest::Client` every gateway call goes through.
    ///
    /// `headers` become default headers on each request; `ControlClient`
    /// uses them to carry the `Authorization` header.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("drguard/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        self.apply_tls(builder)?
            .build()
            .map_err(|e| Error::Tls(format!("HTTP client construction failed: {e}")))
    }

    fn apply_tls(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, Error> {
        match &self.tls {
            TlsPolicy::SystemRoots => Ok(builder),
            TlsPolicy::PinnedCa(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Tls(format!("could not read CA bundle {}: {e}", path.display()))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("CA bundle is not valid PEM: {e}")))?;
                Ok(builder.add_root_certificate(cert))
            }
            TlsPolicy::NoVerify => Ok(builder.danger_accept_invalid_certs(true)),
        }
    }
}
