//! textlens CLI binary - thin wrapper around the textlens library.

mod cli;

use clap::{Parser, Subcommand};
use human_panic::setup_panic;
use textlens::prelude::*;
use tracing::{Level, enabled, error, info};

/// textlens
///
/// Sends text, or a CSV of texts, to a text-classification service and
/// reports sentiment, topics, aspects, emotion, keywords and text metrics.
#[derive(Parser)]
#[clap(author, version = env!("TEXTLENS_VERSION"), about)]
pub(crate) struct Cli {
    #[clap(flatten)]
    pub logging: LoggingOpts,

    #[clap(flatten)]
    pub config: ConfigOptions,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub(crate) struct VersionArgs {
    #[arg(long, action)]
    pub short: bool,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Analyze a single piece of text.
    #[clap(alias("a"))]
    Analyze(AnalyzeArgs),
    /// Analyze every row of a CSV file and save the results.
    #[clap(alias("b"))]
    Batch(BatchArgs),
    /// Check that the service is reachable.
    Health,
    /// Send a file to the service's upload diagnostics.
    DebugUpload(DebugUploadArgs),
    /// Print version info and exit
    #[clap(alias("v"))]
    Version(VersionArgs),
}

impl Command {
    /// Names the per-run log file.
    fn name(&self) -> &'static str {
        match self {
            Command::Analyze(_) => "analyze",
            Command::Batch(_) => "batch",
            Command::Health => "health",
            Command::DebugUpload(_) => "debug-upload",
            Command::Version(_) => "version",
        }
    }
}

#[tokio::main]
async fn main() {
    setup_panic!();

    dotenvy::dotenv().ok();

    let opts = Cli::parse();

    let configured_logger = match opts
        .logging
        .configure_logging(&opts.config.get_run_id(), opts.command.name())
        .await
    {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Unable to set up logging: {:#}", e);
            std::process::exit(1);
        }
    };

    let error_code = run_command(opts).await;

    if error_code != 0 || enabled!(Level::DEBUG) {
        info!(
            target: "user",
            "More detailed logs at {}",
            configured_logger.log_location.display()
        );
    }

    drop(configured_logger);
    std::process::exit(error_code);
}

async fn run_command(opts: Cli) -> i32 {
    let config = match opts.config.load_config().await {
        Ok(c) => c,
        Err(e) => {
            error!(target: "user", "Failed to load configuration: {:#}", e);
            return 2;
        }
    };

    cli::commands::handle_command(&config, &opts.command)
        .await
        .unwrap_or_else(|e| {
            error!(target: "user", "Critical Error. {:#}", e);
            1
        })
}
