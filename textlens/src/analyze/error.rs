use crate::transport::prelude::ServiceError;
use crate::validation::prelude::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Unable to find/open {file_name}")]
    FileNotFound { file_name: String },
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl AnalyzeError {
    /// True when nothing was sent because the input was rejected locally.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyzeError::Invalid(_))
    }
}
