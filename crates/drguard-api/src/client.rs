// Gateway HTTP plumbing. Every endpoint lives under /v1/ and every
// request carries `Authorization: Bearer <token>`.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::Transport;
use crate::types;

/// Error body the gateway attaches to non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Async client for the security control-plane gateway.
///
/// Exposes the four posture-switching verbs (detector update, feature
/// update, associate, disassociate) plus read endpoints for status
/// queries. Mutating verbs are idempotent: a gateway response of
/// `ALREADY_IN_REQUESTED_STATE` is normalized to success, so re-applying
/// the current posture is not an error.
#[derive(Debug)]
pub struct ControlClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ControlClient {
    /// Build from an API token and transport config. The bearer token
    /// rides along as a default header on every request.
    pub fn from_token(
        base_url: &str,
        api_token: &secrecy::SecretString,
        transport: &Transport,
    ) -> Result<Self, Error> {
        let http = transport.build_client(bearer_headers(api_token)?)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Wrap a caller-supplied `reqwest::Client`, auth headers included.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Start a request against a relative path such as `v1/detectors/D1`.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        // normalize_base_url guarantees the trailing slash the join needs.
        let url = self
            .base_url
            .join(path)
            .expect("endpoint paths are valid relative URLs");
        debug!("{method} {url}");
        self.http.request(method, url)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.request(Method::GET, path).send().await?;
        decode(resp).await
    }

    async fn mutate<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let resp = self.request(method, path).json(body).send().await?;
        settle(expect_empty(resp).await)
    }

    async fn remove(&self, path: &str) -> Result<(), Error> {
        let resp = self.request(Method::DELETE, path).send().await?;
        settle(expect_empty(resp).await)
    }

    // ── Detector ─────────────────────────────────────────────────────

    pub async fn get_detector(
        &self,
        detector_id: &str,
    ) -> Result<types::DetectorStateResponse, Error> {
        self.fetch(&format!("v1/detectors/{detector_id}")).await
    }

    /// Switch the coarse-grained detector on or off.
    pub async fn update_detector(&self, detector_id: &str, enable: bool) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body {
            enable: bool,
        }

        self.mutate(
            Method::PATCH,
            &format!("v1/detectors/{detector_id}"),
            &Body { enable },
        )
        .await
    }

    /// Set one named sub-feature of the detector to `ENABLED` or `DISABLED`.
    pub async fn update_feature(
        &self,
        detector_id: &str,
        feature: &str,
        enable: bool,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            status: &'a str,
        }

        let status = if enable { "ENABLED" } else { "DISABLED" };
        self.mutate(
            Method::PUT,
            &format!("v1/detectors/{detector_id}/features/{feature}"),
            &Body { status },
        )
        .await
    }

    // ── Association ──────────────────────────────────────────────────

    pub async fn get_association(
        &self,
        resource_id: &str,
    ) -> Result<types::AssociationResponse, Error> {
        self.fetch(&format!("v1/associations/{resource_id}")).await
    }

    /// Bind a firewall policy to the protected endpoint.
    pub async fn associate(&self, resource_id: &str, web_acl_id: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            web_acl_id: &'a str,
        }

        self.mutate(
            Method::PUT,
            &format!("v1/associations/{resource_id}"),
            &Body { web_acl_id },
        )
        .await
    }

    /// Remove whatever firewall policy is bound to the endpoint.
    pub async fn disassociate(&self, resource_id: &str) -> Result<(), Error> {
        self.remove(&format!("v1/associations/{resource_id}")).await
    }
}

fn bearer_headers(api_token: &secrecy::SecretString) -> Result<HeaderMap, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", api_token.expose_secret()))
        .map_err(|e| Error::Authentication {
            message: format!("token cannot be sent as a header: {e}"),
        })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(reqwest::header::AUTHORIZATION, value);
    Ok(headers)
}

/// Parse the gateway URL, forcing a trailing slash so relative joins of
/// `v1/...` paths land under the configured prefix.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Treat `ALREADY_IN_REQUESTED_STATE` as success. Re-applying the
/// posture a target is already in must not fail the switch.
fn settle(res: Result<(), Error>) -> Result<(), Error> {
    match res {
        Err(ref e) if e.is_already_in_requested_state() => Ok(()),
        other => other,
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(gateway_error(status, resp).await);
    }

    let body = resp.text().await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            let head: String = body.chars().take(160).collect();
            Err(Error::Deserialization {
                message: format!("{e}; body begins {head:?}"),
                body,
            })
        }
    }
}

/// Check status only; mutation endpoints return no body worth reading.
async fn expect_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(gateway_error(status, resp).await)
    }
}

async fn gateway_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Error::InvalidToken;
    }

    let raw = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&raw) {
        Ok(envelope) => Error::Gateway {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_else(|| status.to_string()),
            code: envelope.code,
        },
        Err(_) if raw.is_empty() => Error::Gateway {
            status: status.as_u16(),
            message: status.to_string(),
            code: None,
        },
        Err(_) => Error::Gateway {
            status: status.as_u16(),
            message: raw,
            code: None,
        },
    }
}
