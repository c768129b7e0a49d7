//! `drguard config` subcommands: wizard, profile management, token storage.

use std::collections::HashMap;
use std::str::FromStr;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => run_wizard(),
        ConfigCommand::Show => {
            let cfg = config::load_or_default();
            let rendered =
                output::render_view(&global.output, &cfg, redacted_view, |_| "config".into());
            output::emit(&rendered, global.quiet);
            Ok(())
        }
        ConfigCommand::Set { key, value } => set_key(global, &key, value),
        ConfigCommand::Profiles => {
            list_profiles();
            Ok(())
        }
        ConfigCommand::Use { name } => use_profile(name),
        ConfigCommand::SetToken { profile } => set_token(global, profile),
    }
}

// ── Subcommand bodies ───────────────────────────────────────────────

fn run_wizard() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("✨ drguard — configuration wizard");
    eprintln!("   Writing to: {}\n", path.display());

    let profile_name = ask("Profile name", "default")?;
    let gateway = ask("Gateway URL", "https://guard.example.com")?;
    let api_token = store_or_return_token(ask_token()?, &profile_name)?;

    let detector_id = ask_optional("Detector ID (blank to skip)")?;
    let web_acl_id = ask_optional("Web ACL ID (blank to skip)")?;
    let resource_id = ask_optional("Protected resource ID (blank to skip)")?;

    let profile = Profile {
        api_token,
        detector_id,
        web_acl_id,
        resource_id,
        ..Profile::bare(gateway)
    };
    let cfg = Config {
        default_profile: Some(profile_name.clone()),
        profiles: HashMap::from([(profile_name.clone(), profile)]),
        ..Config::default()
    };
    config::save_config(&cfg)?;

    eprintln!("\n✓ Wrote {}", path.display());
    eprintln!("  Default profile: {profile_name}");
    eprintln!("\n  Next: drguard status");
    Ok(())
}

fn set_key(global: &GlobalOpts, key: &str, value: String) -> Result<(), CliError> {
    let mut cfg = config::load_or_default();
    let profile_name = config::resolve_profile_name(global, &cfg);
    let profile = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(|| Profile::bare(""));

    match key {
        "gateway" => profile.gateway = value,
        "api_token" | "api-token" => profile.api_token = Some(value),
        "api_token_env" | "api-token-env" => profile.api_token_env = Some(value),
        "detector_id" | "detector-id" => profile.detector_id = Some(value),
        "web_acl_id" | "web-acl-id" => profile.web_acl_id = Some(value),
        "resource_id" | "resource-id" => profile.resource_id = Some(value),
        "features" => profile.features = Some(parse_features(&value)?),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_value(key, &value, "'true' or 'false'")?),
        "timeout" => profile.timeout = Some(parse_value(key, &value, "a number of seconds")?),
        "call_timeout" | "call-timeout" => {
            profile.call_timeout = Some(parse_value(key, &value, "a number of seconds")?);
        }
        other => {
            return Err(CliError::Invalid {
                field: other.into(),
                reason: format!("no such key; settable keys are: {SETTABLE_KEYS}"),
            });
        }
    }

    config::save_config(&cfg)?;
    eprintln!("✓ {key} updated on profile '{profile_name}'");
    Ok(())
}

fn list_profiles() {
    let cfg = config::load_or_default();
    if cfg.profiles.is_empty() {
        eprintln!("No profiles yet. Run: drguard config init");
        return;
    }

    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let marker = if name.as_str() == default { " (default)" } else { "" };
        println!("{name}{marker}");
    }
}

fn use_profile(name: String) -> Result<(), CliError> {
    let mut cfg = config::load_or_default();
    if !cfg.profiles.contains_key(&name) {
        return Err(unknown_profile(name, &cfg));
    }

    cfg.default_profile = Some(name.clone());
    config::save_config(&cfg)?;
    eprintln!("✓ Default profile is now '{name}'");
    Ok(())
}

fn set_token(global: &GlobalOpts, profile: Option<String>) -> Result<(), CliError> {
    let cfg = config::load_or_default();
    let profile_name = profile.unwrap_or_else(|| config::resolve_profile_name(global, &cfg));
    if !cfg.profiles.contains_key(&profile_name) {
        return Err(unknown_profile(profile_name, &cfg));
    }

    drguard_config::store_api_token(&profile_name, &ask_token()?)?;
    eprintln!("✓ Keyring token updated for profile '{profile_name}'");
    Ok(())
}

fn unknown_profile(name: String, cfg: &Config) -> CliError {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    let known = if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    };
    CliError::UnknownProfile { name, known }
}

// ── Prompt helpers ──────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Invalid {
        field: "prompt".into(),
        reason: format!("interactive input unavailable: {e}"),
    }
}

fn ask(label: &str, default: &str) -> Result<String, CliError> {
    Input::new()
        .with_prompt(label)
        .default(default.to_owned())
        .interact_text()
        .map_err(prompt_err)
}

/// Empty answers mean "skip this field".
fn ask_optional(label: &str) -> Result<Option<String>, CliError> {
    let answer: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    Ok(Some(answer).filter(|a| !a.is_empty()))
}

fn ask_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Invalid {
            field: "api_token".into(),
            reason: "token must not be empty".into(),
        });
    }
    Ok(token)
}

/// Ask where the token should live. Keyring storage returns `None`;
/// plaintext hands the token back for the config file.
fn store_or_return_token(token: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let keyring = Select::new()
        .with_prompt("Token storage")
        .items(&["System keyring (recommended)", "Config file (plaintext)"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
        == 0;

    if keyring {
        drguard_config::store_api_token(profile_name, &token)?;
        eprintln!("   ✓ Token saved to the system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

// ── Display helpers ─────────────────────────────────────────────────

const SETTABLE_KEYS: &str = "gateway, api_token, api_token_env, detector_id, web_acl_id, \
     resource_id, features, ca_cert, insecure, timeout, call_timeout";

fn parse_value<T: FromStr>(field: &str, value: &str, expect: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Invalid {
        field: field.into(),
        reason: format!("expected {expect}, got '{value}'"),
    })
}

fn parse_features(value: &str) -> Result<Vec<String>, CliError> {
    let features: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_owned)
        .collect();
    if features.is_empty() {
        return Err(CliError::Invalid {
            field: "features".into(),
            reason: "expected a comma-separated list of feature names".into(),
        });
    }
    Ok(features)
}

/// TOML-shaped rendering of the loaded config with secrets masked.
fn redacted_view(cfg: &Config) -> String {
    let mut lines = Vec::new();
    if let Some(name) = cfg.default_profile.as_deref() {
        lines.push(format!("default_profile = {name:?}"));
    }
    lines.push(String::new());
    lines.push("[defaults]".into());
    lines.push(format!("output = {:?}", cfg.defaults.output));
    lines.push(format!("color = {:?}", cfg.defaults.color));
    lines.push(format!("insecure = {}", cfg.defaults.insecure));
    lines.push(format!("timeout = {}", cfg.defaults.timeout));

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        lines.push(String::new());
        lines.push(format!("[profiles.{name}]"));
        lines.push(format!("gateway = {:?}", p.gateway));
        if p.api_token.is_some() {
            lines.push("api_token = \"****\"".into());
        }
        push_opt(&mut lines, "api_token_env", p.api_token_env.as_deref());
        push_opt(&mut lines, "detector_id", p.detector_id.as_deref());
        push_opt(&mut lines, "web_acl_id", p.web_acl_id.as_deref());
        push_opt(&mut lines, "resource_id", p.resource_id.as_deref());
        if let Some(features) = &p.features {
            lines.push(format!("features = {features:?}"));
        }
        if let Some(ca) = &p.ca_cert {
            lines.push(format!("ca_cert = {:?}", ca.display().to_string()));
        }
        if let Some(v) = p.insecure {
            lines.push(format!("insecure = {v}"));
        }
        if let Some(v) = p.timeout {
            lines.push(format!("timeout = {v}"));
        }
        if let Some(v) = p.call_timeout {
            lines.push(format!("call_timeout = {v}"));
        }
    }
    lines.join("\n")
}

fn push_opt(lines: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        lines.push(format!("{key} = {v:?}"));
    }
}
