mod analysis;
mod service;
mod upload;

pub mod prelude {
    pub use super::analysis::{
        AnalysisRequest, AnalysisResult, EmotionLabel, EmotionResult, EmotionScores,
        SentimentLabel, SentimentResult, SentimentScores, TextMetrics, TopicsResult,
    };
    pub use super::service::{HealthStatus, UploadDiagnostic};
    pub use super::upload::{
        BATCH_RESULT_FILE_NAME, BatchArtifact, BatchMode, BatchUploadJob, UploadFile,
    };
}
