use crate::batch::orchestrator::BatchAnalyzer;
use crate::models::prelude::{BatchMode, UploadFile};
use crate::report_stdout;
use crate::shared::prelude::{FoundConfig, Notification, Notifier, TracingNotifier, upload_spinner};
use crate::shared::resolve_relative;
use crate::transport::prelude::{ServiceClient, abort_on_ctrl_c};
use crate::validation::prelude::check_csv_upload;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file with a `text` column, at most 10MB
    file: PathBuf,

    /// Sentiment only, for a quick look at the first rows
    #[arg(long, short)]
    quick: bool,

    /// Where to save text_analysis_results.csv. Defaults to `outputDir` from
    /// the config file, then the working directory.
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DebugUploadArgs {
    /// File to send to the service's upload diagnostics
    file: PathBuf,
}

impl BatchArgs {
    fn mode(&self) -> BatchMode {
        if self.quick {
            BatchMode::Quick
        } else {
            BatchMode::Full
        }
    }
}

pub async fn batch_root(found_config: &FoundConfig, args: &BatchArgs) -> Result<i32> {
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let client = ServiceClient::from_config(found_config, notifier.clone())?;
    let mut analyzer = BatchAnalyzer::new(client);

    let path = resolve_relative(&found_config.working_dir, &args.file);
    let Some(file) = read_checked(&path, notifier.as_ref()).await? else {
        return Ok(1);
    };
    if analyzer.select_file(file).is_err() {
        return Ok(1);
    }

    let span = info_span!("batch", "indicatif.pb_show" = true);
    span.pb_set_style(&upload_spinner());
    let message = format!("Analyzing {} ({} mode)", args.file.display(), args.mode());
    span.pb_set_message(&message);
    info!(target: "progress", "{}", message);

    let cancel = abort_on_ctrl_c(analyzer.abort_handle());
    let outcome = analyzer.process(args.mode()).instrument(span).await;
    cancel.abort();

    if outcome.is_err() {
        return Ok(1);
    }

    let output_dir = match &args.output_dir {
        Some(dir) => resolve_relative(&found_config.working_dir, dir),
        None => found_config.output_dir.clone(),
    };

    match analyzer.download(&output_dir).await {
        Ok(saved) => {
            report_stdout!("{}", saved.display());
            Ok(0)
        }
        Err(e) => {
            error!(target: "user", "{}", e);
            Ok(1)
        }
    }
}

pub async fn debug_upload_root(found_config: &FoundConfig, args: &DebugUploadArgs) -> Result<i32> {
    let client = ServiceClient::from_config(found_config, Arc::new(TracingNotifier))?;
    let path = resolve_relative(&found_config.working_dir, &args.file);
    let file = UploadFile::read(&path)
        .await
        .with_context(|| format!("Unable to find/open {}", path.display()))?;

    let Ok(diagnostic) = client.debug_upload(&file).await else {
        return Ok(1);
    };

    report_stdout!("message: {}", diagnostic.message);
    report_stdout!(
        "filename: {}",
        diagnostic.filename.as_deref().unwrap_or("-")
    );
    report_stdout!(
        "content_length: {}",
        diagnostic
            .content_length
            .map(|len| len.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    report_stdout!(
        "mimetype: {}",
        diagnostic.mimetype.as_deref().unwrap_or("-")
    );
    Ok(0)
}

/// Checks name and size from the file's metadata so an oversized file is
/// rejected without being read.
async fn read_checked(path: &Path, notifier: &dyn Notifier) -> Result<Option<UploadFile>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Unable to find/open {}", path.display()))?;

    let name = UploadFile::name_from_path(path);
    if let Err(e) = check_csv_upload(&name, metadata.len()) {
        notifier.notify(Notification::error(e.to_string()));
        return Ok(None);
    }

    debug!("Reading {} ({} bytes)", path.display(), metadata.len());
    let file = UploadFile::read(path)
        .await
        .with_context(|| format!("Unable to read {}", path.display()))?;
    Ok(Some(file))
}
