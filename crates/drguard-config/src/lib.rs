//! Shared configuration for the drguard CLI.
//!
//! TOML profiles, API token resolution (keyring + env + plaintext), and
//! translation to `drguard_core::SwitchConfig`. The CLI layers
//! `GlobalOpts`-aware flag overrides on top of what this crate loads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use drguard_core::SwitchConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is not valid: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("could not serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config file could not be loaded: {0}")]
    Figment(Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration: a default profile name, global
/// defaults, and any number of named gateway profiles.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

/// Global defaults applied when a profile or flag does not override them.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    pub output: String,
    pub color: String,
    pub insecure: bool,
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: "table".into(),
            color: "auto".into(),
            insecure: false,
            timeout: 30,
        }
    }
}

/// A named gateway profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Control-plane gateway base URL (e.g., "https://guard.example.com").
    pub gateway: String,

    /// API token (plaintext — prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Threat-detection engine driven by posture switches.
    pub detector_id: Option<String>,

    /// Firewall policy bound on activation.
    pub web_acl_id: Option<String>,

    /// Protected endpoint the policy binds to.
    pub resource_id: Option<String>,

    /// Detector sub-features to toggle; built-in set when omitted.
    pub features: Option<Vec<String>>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override HTTP timeout (seconds).
    pub timeout: Option<u64>,

    /// Override per-call budget for control-plane operations (seconds).
    pub call_timeout: Option<u64>,
}

impl Profile {
    /// Profile with only a gateway set. `config set` creates one of
    /// these implicitly before filling in keys.
    pub fn bare(gateway: impl Into<String>) -> Self {
        Self {
            gateway: gateway.into(),
            api_token: None,
            api_token_env: None,
            detector_id: None,
            web_acl_id: None,
            resource_id: None,
            features: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            call_timeout: None,
        }
    }

    /// Translate profile fields into a core `SwitchConfig`.
    ///
    /// CLI flag overrides are applied by the caller afterwards; this is
    /// the profile layer only.
    pub fn switch_config(&self) -> SwitchConfig {
        let base = SwitchConfig::default();
        SwitchConfig {
            detector_id: self.detector_id.clone(),
            web_acl_id: self.web_acl_id.clone(),
            resource_id: self.resource_id.clone(),
            features: self.features.clone().unwrap_or(base.features),
            per_call_timeout: self
                .call_timeout
                .map_or(base.per_call_timeout, Duration::from_secs),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Canonical config file location (XDG on Linux, platform dirs elsewhere).
pub fn config_path() -> PathBuf {
    let base = ProjectDirs::from("dev", "stormfell", "drguard")
        .map(|dirs| dirs.config_dir().to_owned())
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
            home.join(".config").join("drguard")
        });
    base.join("config.toml")
}

// ── Config loading & saving ─────────────────────────────────────────

/// Load configuration by layering defaults, the TOML file, and
/// `DRGUARD_`-prefixed environment variables.
pub fn load() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("DRGUARD_").split("_"));
    Ok(figment.extract()?)
}

/// Like [`load`], but a missing or broken file yields the defaults.
pub fn load_or_default() -> Config {
    load().unwrap_or_default()
}

/// Write the configuration to the canonical path, creating parent
/// directories as needed.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(std::fs::write(path, toml::to_string_pretty(cfg)?)?)
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the API token for a profile.
///
/// Checked in order: the environment variable the profile names, the
/// system keyring, then plaintext in the config file.
pub fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    let from_env = profile
        .api_token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok());
    if let Some(token) = from_env {
        return Ok(SecretString::from(token));
    }

    if let Some(token) = keyring_token(profile_name) {
        return Ok(token);
    }

    profile
        .api_token
        .as_deref()
        .map(|t| SecretString::from(t.to_owned()))
        .ok_or_else(|| ConfigError::NoToken {
            profile: profile_name.to_owned(),
        })
}

/// Store an API token in the system keyring for a profile.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let keyring_err = |e: keyring::Error| ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    };
    keyring_entry(profile_name)
        .map_err(keyring_err)?
        .set_password(token)
        .map_err(keyring_err)
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new("drguard", &format!("{profile_name}/api-token"))
}

fn keyring_token(profile_name: &str) -> Option<SecretString> {
    let secret = keyring_entry(profile_name).ok()?.get_password().ok()?;
    Some(SecretString::from(secret))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn minimal_profile() -> Profile {
        toml::from_str(r#"gateway = "https://guard.example.com""#).unwrap()
    }

    #[test]
    fn default_config_targets_default_profile() {
        let config = Config::default();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.timeout, 30);
    }

    #[test]
    fn profile_parses_with_only_a_gateway() {
        let profile = minimal_profile();
        assert_eq!(profile.gateway, "https://guard.example.com");
        assert!(profile.detector_id.is_none());
        assert!(profile.features.is_none());
        assert!(profile.insecure.is_none());
    }

    #[test]
    fn partial_defaults_table_fills_in_the_rest() {
        let config: Config = toml::from_str(
            r#"
            [defaults]
            timeout = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults.timeout, 5);
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.color, "auto");
    }

    #[test]
    fn switch_config_falls_back_to_builtin_features() {
        let switch = minimal_profile().switch_config();
        assert_eq!(switch.features.len(), 3);
        assert!(switch.features.iter().any(|f| f == "EKS_RUNTIME_MONITORING"));
        assert_eq!(switch.per_call_timeout, Duration::from_secs(15));
    }

    #[test]
    fn switch_config_prefers_profile_values() {
        let profile: Profile = toml::from_str(
            r#"
            gateway = "https://guard.example.com"
            detector_id = "D1"
            web_acl_id = "W1"
            resource_id = "L1"
            features = ["EKS_RUNTIME_MONITORING"]
            call_timeout = 20
            "#,
        )
        .unwrap();

        let switch = profile.switch_config();
        assert_eq!(switch.detector_id.as_deref(), Some("D1"));
        assert_eq!(switch.web_acl_id.as_deref(), Some("W1"));
        assert_eq!(switch.resource_id.as_deref(), Some("L1"));
        assert_eq!(switch.features, vec!["EKS_RUNTIME_MONITORING"]);
        assert_eq!(switch.per_call_timeout, Duration::from_secs(20));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.profiles.insert(
            "prod".into(),
            Profile {
                api_token_env: Some("PROD_GUARD_TOKEN".into()),
                detector_id: Some("D1".into()),
                web_acl_id: Some("W1".into()),
                resource_id: Some("L1".into()),
                timeout: Some(10),
                ..Profile::bare("https://guard.example.com")
            },
        );

        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        let profile = &parsed.profiles["prod"];
        assert_eq!(profile.gateway, "https://guard.example.com");
        assert_eq!(profile.api_token_env.as_deref(), Some("PROD_GUARD_TOKEN"));
        assert_eq!(profile.timeout, Some(10));
    }
}
