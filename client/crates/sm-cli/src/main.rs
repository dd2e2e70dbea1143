//! sm-session - school manager session client
//!
//! Drives the session layer against file-backed stores, one process per
//! page load.
//!
//! # Examples
//!
//! ```bash
//! sm-session login --email ada@school.example --password secret --remember
//! sm-session whoami --pretty
//! sm-session update --image https://cdn.school.example/avatars/new.png
//! sm-session close-browser
//! ```

mod cli;
mod commands;

use crate::{cli::Cli, commands::Commands};

use sm_cli::{CliResult, SessionReport, close_browser, logger, open_session};
use sm_config::Config;
use sm_session::{Credentials, DispatchOutcome, ImageRef, ProfilePatch, SessionIntent};

use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the session report; a rejected intent exits non-zero.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = Config::load()?;
    config.validate()?;

    let log_file = match config.logging.file {
        Some(ref filename) => Some(Config::config_dir()?.join(filename)),
        None => None,
    };
    logger::initialize(config.logging.level, log_file, config.logging.colored)?;

    info!("sm-session v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    if let Commands::CloseBrowser = cli.command {
        close_browser(&config)?;
    }

    let mut hooks = open_session(&config, cli.server.as_deref())?;
    let mut explicit_image = None;

    let result = match cli.command {
        Commands::Login {
            email,
            password,
            remember,
        } => Some(
            hooks
                .dispatch(SessionIntent::Login {
                    credentials: Credentials::new(email, password),
                    remember_me: remember,
                })
                .await,
        ),
        Commands::Logout => Some(hooks.dispatch(SessionIntent::Logout).await),
        Commands::Whoami { image } => {
            explicit_image = image.and_then(ImageRef::new);
            None
        }
        Commands::Update {
            first_name,
            last_name,
            email,
            image,
        } => {
            let patch = ProfilePatch {
                first_name,
                last_name,
                email,
                profile_image: image.and_then(ImageRef::new),
            };
            Some(hooks.dispatch(SessionIntent::UpdateProfile(patch)).await)
        }
        Commands::RefreshImage => Some(hooks.dispatch(SessionIntent::ForceRefreshImage).await),
        Commands::CloseBrowser => None,
    };

    let rejected = matches!(result, Some(DispatchOutcome::Rejected { .. }));
    let report = SessionReport {
        session: hooks.state(),
        identity: hooks.merged_identity_with(explicit_image.as_ref()),
        remember_me: hooks.orchestrator().remember_me(),
        result,
    };
    println!("{}", report.render(cli.pretty)?);

    if rejected {
        warn!("Command rejected");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
