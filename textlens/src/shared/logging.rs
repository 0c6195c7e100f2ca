use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use tracing::level_filters::LevelFilter;
use tracing::{Level, Metadata};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::{IndicatifFilter, hide_indicatif_span_fields};
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::{
    Registry,
    fmt::format::{Format, PrettyFields},
    layer::SubscriberExt,
};
use tracing_subscriber::{filter::filter_fn, prelude::*};

const LOG_DIR: &str = "/tmp/textlens";

/// Console messages for the user, shown once verbosity allows their level.
const USER_TARGET: &str = "user";
/// Notifications. Shown whatever the verbosity.
const ALWAYS_TARGET: &str = "always";
/// Progress lines printed instead of a spinner when output is plain.
const PROGRESS_TARGET: &str = "progress";

/// Spinner shown while a CSV is being processed by the service. The upload
/// has no measurable progress, so only elapsed time is displayed.
pub fn upload_spinner() -> ProgressStyle {
    ProgressStyle::with_template("{span_child_prefix} {spinner:.green} {wide_msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

#[derive(Parser, Debug)]
#[clap(group = ArgGroup::new("logging"))]
pub struct LoggingOpts {
    /// Show request logs (-v), response details (-vv) or everything (-vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global(true))]
    pub verbose: u8,

    #[arg(
        long,
        global(true),
        default_value = "auto",
        env = "TEXTLENS_OUTPUT_PROGRESS"
    )]
    /// Whether to draw a spinner during batch uploads. Use plain for logs and CI.
    pub progress: LoggingProgress,
}

#[derive(ValueEnum, Debug, Copy, Clone)]
pub enum LoggingProgress {
    /// Spinner when stdout is a terminal
    Auto,
    /// No spinner, progress is logged as plain lines
    Plain,
    /// Always draw the spinner
    Tty,
}

impl LoggingProgress {
    fn is_tty(&self) -> bool {
        match self {
            LoggingProgress::Auto => std::io::stdout().is_terminal(),
            LoggingProgress::Plain => false,
            LoggingProgress::Tty => true,
        }
    }
}

lazy_static! {
    /// Where rendered results go. Routed through the progress layer once
    /// logging is configured so output does not tear the spinner.
    pub static ref STDOUT_WRITER: Arc<RwLock<Box<dyn Write + Sync + Send>>> =
        Arc::new(RwLock::new(Box::new(std::io::stdout())));
}

/// Keeps the file writer alive. Dropping it flushes the log file.
pub struct ConfiguredLogger {
    _guard: tracing_appender::non_blocking::WorkerGuard,
    pub log_location: PathBuf,
}

impl LoggingOpts {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Installs the global subscriber. Everything goes to
    /// `/tmp/textlens/textlens-<command>-<run_id>.log`; the console only gets
    /// the user-facing targets.
    pub async fn configure_logging(
        &self,
        run_id: &str,
        command: &str,
    ) -> Result<ConfiguredLogger> {
        let log_location = log_file_path(Path::new(LOG_DIR), command, run_id);
        std::fs::create_dir_all(LOG_DIR)
            .with_context(|| format!("Unable to create log directory {}", LOG_DIR))?;
        let log_file = File::create(&log_location)
            .with_context(|| format!("Unable to create log file {}", log_location.display()))?;

        let (non_blocking, guard) =
            tracing_appender::non_blocking(strip_ansi_escapes::Writer::new(log_file));

        let file_output = tracing_subscriber::fmt::layer()
            .event_format(Format::default().pretty())
            .with_ansi(false)
            .with_writer(non_blocking);

        let indicatif_layer = IndicatifLayer::new()
            .with_span_field_formatter(hide_indicatif_span_fields(DefaultFields::new()))
            .with_progress_style(upload_spinner());
        let indicatif_writer = indicatif_layer.get_stdout_writer();
        *STDOUT_WRITER.write().await = Box::new(indicatif_layer.get_stdout_writer());

        let is_tty_output = self.progress.is_tty();
        let level_filter = self.to_level_filter();
        let console_output = tracing_subscriber::fmt::layer()
            .event_format(
                Format::default()
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .with_writer(indicatif_writer)
            .fmt_fields(PrettyFields::new())
            .with_filter(filter_fn(move |metadata| {
                shows_on_console(metadata, level_filter, is_tty_output)
            }));

        let progress_layer =
            is_tty_output.then(|| indicatif_layer.with_filter(IndicatifFilter::new(false)));

        let subscriber = Registry::default()
            .with(console_output)
            .with(progress_layer)
            .with(file_output);

        tracing::subscriber::set_global_default(subscriber)
            .context("A global tracing subscriber was already installed")?;

        Ok(ConfiguredLogger {
            _guard: guard,
            log_location,
        })
    }
}

fn log_file_path(dir: &Path, command: &str, run_id: &str) -> PathBuf {
    dir.join(format!("textlens-{}-{}.log", command, run_id))
}

/// Request logs from the client and other module targets only reach the log
/// file. So does the `stdout` target, which mirrors rendered results.
fn shows_on_console(metadata: &Metadata<'_>, level_filter: LevelFilter, is_tty: bool) -> bool {
    target_on_console(metadata.target(), *metadata.level(), level_filter, is_tty)
}

fn target_on_console(
    target: &str,
    level: Level,
    level_filter: LevelFilter,
    is_tty: bool,
) -> bool {
    match target {
        USER_TARGET => level_filter >= level,
        ALWAYS_TARGET => true,
        PROGRESS_TARGET => !is_tty,
        _ => false,
    }
}
