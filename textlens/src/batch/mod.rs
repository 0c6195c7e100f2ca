mod cli;
mod error;
mod orchestrator;

pub mod prelude {
    pub use super::cli::{BatchArgs, DebugUploadArgs, batch_root, debug_upload_root};
    pub use super::error::{BatchError, PROCESSING_TIMEOUT_MESSAGE};
    pub use super::orchestrator::{BatchAnalyzer, BatchState};
}
