mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    install_tracing(cli.global.verbose);

    match try_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Default filter tracks the -v count; RUST_LOG wins when set.
fn install_tracing(verbosity: u8) {
    let fallback = ["warn", "info", "debug", "trace"][usize::from(verbosity.min(3))];
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // Diagnostics on stderr; stdout stays machine-readable for --output json.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn try_main(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local-only commands, no gateway client needed.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Completions { shell } => {
            write_completions(shell);
            Ok(())
        }

        cmd => gateway_command(cmd, &cli.global).await,
    }
}

async fn gateway_command(cmd: Command, global: &cli::GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_or_default();
    let profile_name = config::resolve_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);
    let client = config::resolve_client(profile, &profile_name, global)?;

    tracing::debug!(command = ?cmd, profile = %profile_name, "gateway client ready");
    commands::dispatch(cmd, &client, profile, global).await
}

fn write_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "drguard", &mut std::io::stdout());
}
