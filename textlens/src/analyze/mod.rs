mod cli;
mod error;
mod orchestrator;

pub mod prelude {
    pub use super::cli::{AnalyzeArgs, PartialAnalysis, analyze_root};
    pub use super::error::AnalyzeError;
    pub use super::orchestrator::{SubmissionState, TextAnalyzer};
}
