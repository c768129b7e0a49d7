//! Gateway-bound command handlers and their shared dispatch.

pub mod config_cmd;
pub mod status;
pub mod switch;

use drguard_api::ControlClient;
use drguard_core::Posture;

use crate::cli::{Command, GlobalOpts};
use crate::config::Profile;
use crate::error::CliError;

/// Route a parsed command to its handler.
///
/// `Config` and `Completions` never reach this point; `main` handles
/// them before building a client.
pub async fn dispatch(
    cmd: Command,
    client: &ControlClient,
    profile: Option<&Profile>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Activate(args) => {
            switch::handle(client, profile, args, Posture::Active, global).await
        }
        Command::Deactivate(args) => {
            switch::handle(client, profile, args, Posture::Inactive, global).await
        }
        Command::Status(args) => status::handle(client, profile, args, global).await,
        Command::Config(_) | Command::Completions { .. } => unreachable!(),
    }
}

/// Ask before a posture change; `--yes` answers for the user.
pub(crate) fn confirm(message: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    let answer = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact();
    answer.map_err(|e| CliError::Io(std::io::Error::other(e)))
}
