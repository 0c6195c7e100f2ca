//! Command routing for the CLI, keeping the binary itself thin.

use crate::{Command, VersionArgs};
use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use textlens::prelude::*;
use textlens::report_stdout;
use tracing::instrument;

/// Route a command to its appropriate handler.
pub async fn handle_command(found_config: &FoundConfig, command: &Command) -> Result<i32> {
    match command {
        Command::Analyze(args) => analyze_root(found_config, args).await,
        Command::Batch(args) => batch_root(found_config, args).await,
        Command::Health => check_health(found_config).await,
        Command::DebugUpload(args) => debug_upload_root(found_config, args).await,
        Command::Version(args) => print_version(args).await,
    }
}

#[instrument("textlens health", skip_all)]
async fn check_health(found_config: &FoundConfig) -> Result<i32> {
    let client = ServiceClient::from_config(found_config, Arc::new(TracingNotifier))?;

    let Ok(status) = client.health().await else {
        return Ok(1);
    };

    let message = status.message.clone().unwrap_or_default();
    if status.is_healthy() {
        report_stdout!("{} {} {}", "healthy".green().bold(), found_config.api_url, message);
        Ok(0)
    } else {
        report_stdout!(
            "{} {} {}",
            status.status.as_str().red().bold(),
            found_config.api_url,
            message
        );
        Ok(1)
    }
}

#[instrument("textlens version", skip_all)]
async fn print_version(args: &VersionArgs) -> Result<i32> {
    if args.short {
        report_stdout!("textlens {}", env!("TEXTLENS_VERSION"));
    } else {
        report_stdout!(
            "{}: {:60}",
            "Version".white().bold(),
            env!("TEXTLENS_VERSION")
        );
        report_stdout!(
            "{}: {:60}",
            "Build Timestamp".white().bold(),
            env!("VERGEN_BUILD_TIMESTAMP")
        );
        report_stdout!(
            "{}: {:60}",
            "Describe".white().bold(),
            env!("VERGEN_GIT_DESCRIBE")
        );
        report_stdout!(
            "{}: {:60}",
            "Commit SHA".white().bold(),
            env!("VERGEN_GIT_SHA")
        );
    }

    Ok(0)
}
