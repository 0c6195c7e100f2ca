use crate::transport::prelude::ServiceError;
use crate::validation::prelude::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

pub const PROCESSING_TIMEOUT_MESSAGE: &str =
    "Processing timeout. Try with a smaller file (max 100 rows recommended).";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The upload ran out of time or was aborted.
    #[error("Processing timeout. Try with a smaller file (max 100 rows recommended).")]
    ProcessingTimeout(#[source] ServiceError),
    #[error(transparent)]
    Service(ServiceError),
    #[error("Batch processing was cancelled before it finished")]
    Cancelled,
    #[error("No batch results to download")]
    NothingToDownload,
    #[error("Unable to save results to {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },
}

impl BatchError {
    /// Splits transport failures into timeouts, which get retry guidance, and
    /// everything else, which keeps the service's own message.
    pub fn from_service(error: ServiceError) -> Self {
        if error.is_timeout() {
            BatchError::ProcessingTimeout(error)
        } else {
            BatchError::Service(error)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BatchError::ProcessingTimeout(_))
    }
}
