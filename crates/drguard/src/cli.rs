//! Command-line surface of `drguard`.
//!
//! Pure clap derive types. build.rs includes this file on its own to
//! generate man pages, so nothing here may import the rest of the crate.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Entry point ──────────────────────────────────────────────────────

/// drguard -- posture switching for managed security controls
#[derive(Debug, Parser)]
#[command(name = "drguard", version, propagate_version = true)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(
    about = "Switch managed security controls between DR postures",
    long_about = "Drives a managed threat detector, its sub-features, and a\n\
        firewall-to-endpoint association between the Active and Inactive\n\
        security postures as one orchestrated disaster-recovery switch."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global flags ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Named profile from the config file
    #[arg(long, short = 'p', env = "DRGUARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway base URL (beats the profile value)
    #[arg(long, short = 'g', env = "DRGUARD_GATEWAY", global = true)]
    pub gateway: Option<String>,

    /// API token presented to the gateway
    #[arg(long, env = "DRGUARD_API_TOKEN", global = true, hide_env = true)]
    pub api_token: Option<String>,

    /// Output format for command results
    #[arg(long, short = 'o', env = "DRGUARD_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Color control for tables and reports
    #[arg(long, env = "DRGUARD_COLOR", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// More log detail (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print nothing but errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Assume yes for every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "DRGUARD_INSECURE", global = true)]
    pub insecure: bool,

    /// HTTP timeout in seconds (default 30)
    #[arg(long, env = "DRGUARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Rendering enums ──────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Rounded table for interactive use (default)
    Table,
    /// Indented JSON
    Json,
    /// JSON without whitespace
    JsonCompact,
    /// YAML document
    Yaml,
    /// Bare values, one per line, for scripts
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    Auto,
    /// Force color on
    Always,
    /// Force color off
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Switch every managed control to the Active posture
    #[command(alias = "up")]
    Activate(SwitchArgs),

    /// Switch every managed control to the Inactive posture
    #[command(alias = "down")]
    Deactivate(SwitchArgs),

    /// Show the observed state of the managed controls
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Profiles, defaults, and stored tokens
    Config(ConfigArgs),

    /// Emit a completion script for a shell
    Completions {
        /// Shell dialect to emit
        shell: Shell,
    },
}

// ── Control identifiers ──────────────────────────────────────────────

/// Control identifiers shared by posture and status commands.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Detector ID (overrides profile)
    #[arg(long, env = "DRGUARD_DETECTOR", value_name = "ID")]
    pub detector: Option<String>,

    /// Firewall policy (web ACL) ID to bind on activation (overrides profile)
    #[arg(long = "web-acl", env = "DRGUARD_WEB_ACL", value_name = "ID")]
    pub web_acl: Option<String>,

    /// Protected endpoint ID the policy binds to (overrides profile)
    #[arg(long, env = "DRGUARD_RESOURCE", value_name = "ID")]
    pub resource: Option<String>,
}

// ── Posture switch arguments ─────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Detector sub-feature to toggle (repeatable; replaces the profile set)
    #[arg(long = "feature", value_name = "NAME")]
    pub features: Vec<String>,

    /// Budget in seconds for each individual control-plane call
    #[arg(long, value_name = "SECS")]
    pub call_timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

// ── Config subcommands ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive wizard that writes a first config file
    Init,

    /// Print the resolved configuration with secrets masked
    Show,

    /// Write one key on the active profile
    Set {
        /// Key to write (gateway, detector_id, features, ...)
        key: String,

        /// New value
        value: String,
    },

    /// List profiles; the default is marked
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile to promote
        name: String,
    },

    /// Put an API token in the system keyring
    SetToken {
        /// Profile the token belongs to (default: the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}
