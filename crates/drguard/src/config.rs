//! CLI configuration — thin wrapper around `drguard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--gateway, --api-token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use drguard_api::{ControlClient, TlsPolicy, Transport};
use drguard_core::SwitchConfig;

use crate::cli::{GlobalOpts, SwitchArgs, TargetArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use drguard_config::{
    Config, Defaults, Profile, config_path, load_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn resolve_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a gateway client from a profile (if any) plus global flags.
///
/// CLI flag overrides take priority over profile values. Without a
/// profile the gateway and token flags (or their env vars) are required.
pub fn resolve_client(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ControlClient, CliError> {
    // 1. Gateway URL (flag > env > profile)
    let gateway = match (global.gateway.as_deref(), profile) {
        (Some(url), _) => url,
        (None, Some(p)) => &p.gateway,
        (None, None) => {
            return Err(CliError::ConfigMissing {
                path: config_path().display().to_string(),
            });
        }
    };

    // 2. API token (CLI flag takes priority)
    let token = resolve_token_with_flag(profile, profile_name, global)?;

    // 3. TLS verification
    let tls = if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsPolicy::NoVerify
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.as_ref()) {
        TlsPolicy::PinnedCa(ca_path.clone())
    } else {
        TlsPolicy::SystemRoots
    };

    // 4. Overall request timeout (flag > profile > built-in 30s)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or_else(|| profile.and_then(|p| p.timeout))
            .unwrap_or(30),
    );

    let transport = Transport { tls, timeout };
    Ok(ControlClient::from_token(gateway, &token, &transport)?)
}

/// Merge profile identifiers with `--detector`/`--web-acl`/`--resource` overrides.
pub fn resolve_targets(profile: Option<&Profile>, target: &TargetArgs) -> SwitchConfig {
    let mut config = profile.map_or_else(SwitchConfig::default, Profile::switch_config);

    if target.detector.is_some() {
        config.detector_id = target.detector.clone();
    }
    if target.web_acl.is_some() {
        config.web_acl_id = target.web_acl.clone();
    }
    if target.resource.is_some() {
        config.resource_id = target.resource.clone();
    }
    config
}

/// Full switch configuration: targets plus feature and timeout overrides.
pub fn resolve_switch_config(profile: Option<&Profile>, args: &SwitchArgs) -> SwitchConfig {
    let mut config = resolve_targets(profile, &args.target);

    if !args.features.is_empty() {
        config.features = args.features.clone();
    }
    if let Some(secs) = args.call_timeout {
        config.per_call_timeout = Duration::from_secs(secs);
    }
    config
}

/// Resolve the API token with CLI flag override, then fall through to shared resolution.
fn resolve_token_with_flag(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    // CLI flag takes priority
    if let Some(ref token) = global.api_token {
        return Ok(SecretString::from(token.clone()));
    }
    match profile {
        Some(p) => Ok(drguard_config::resolve_api_token(p, profile_name)?),
        None => Err(CliError::NoToken {
            profile: profile_name.to_owned(),
        }),
    }
}
