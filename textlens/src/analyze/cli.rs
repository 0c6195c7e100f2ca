use super::error::AnalyzeError;
use super::orchestrator::TextAnalyzer;
use crate::present::prelude::{OutputFormat, render_result, render_sentiment, render_topics};
use crate::report_stdout;
use crate::shared::prelude::{FoundConfig, TracingNotifier};
use crate::shared::resolve_relative;
use crate::transport::prelude::{ServiceClient, abort_on_ctrl_c};
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::debug;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Text to analyze, for stdin use '-'
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    text: Option<String>,

    /// Read the text to analyze from a file
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Run only part of the analysis
    #[arg(long, value_enum)]
    only: Option<PartialAnalysis>,

    /// How to print the result
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialAnalysis {
    Sentiment,
    Topics,
}

pub async fn analyze_root(found_config: &FoundConfig, args: &AnalyzeArgs) -> Result<i32> {
    let text = read_text(&found_config.working_dir, args).await?;
    debug!("Analyzing {} characters", text.chars().count());

    let client = ServiceClient::from_config(found_config, Arc::new(TracingNotifier))?;
    let mut analyzer = TextAnalyzer::new(client);
    let cancel = abort_on_ctrl_c(analyzer.abort_handle());

    let rendered = match args.only {
        None => analyzer
            .submit(&text)
            .await
            .map(|result| render_result(&result, args.format)),
        Some(PartialAnalysis::Sentiment) => analyzer
            .sentiment(&text)
            .await
            .map(|result| render_sentiment(&result, args.format)),
        Some(PartialAnalysis::Topics) => analyzer
            .topics(&text)
            .await
            .map(|result| render_topics(&result, args.format)),
    };
    cancel.abort();

    match rendered {
        Ok(output) => {
            let output = output?;
            report_stdout!("{}", output.trim_end());
            Ok(0)
        }
        // already reported through the notifier
        Err(AnalyzeError::Invalid(_)) | Err(AnalyzeError::Service(_)) => Ok(1),
        Err(e) => Err(e.into()),
    }
}

async fn read_text(working_dir: &Path, args: &AnalyzeArgs) -> Result<String, AnalyzeError> {
    match (&args.text, &args.file) {
        (_, Some(file)) => read_from_file(&resolve_relative(working_dir, file)).await,
        (Some(text), None) if text == "-" => read_from_stdin().await,
        (Some(text), None) => Ok(text.clone()),
        (None, None) => Ok(String::new()),
    }
}

async fn read_from_stdin() -> Result<String, AnalyzeError> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

async fn read_from_file(file_path: &Path) -> Result<String, AnalyzeError> {
    if !file_path.exists() {
        return Err(AnalyzeError::FileNotFound {
            file_name: file_path.display().to_string(),
        });
    }
    Ok(tokio::fs::read_to_string(file_path).await?)
}
