use crate::batch::error::BatchError;
use crate::models::prelude::{BatchArtifact, BatchMode, BatchUploadJob, UploadFile};
use crate::shared::prelude::{Notification, Notifier};
use crate::transport::prelude::{AbortHandle, ServiceClient};
use crate::transport::{AbortSlot, InFlight};
use crate::validation::prelude::{ValidationError, validate_csv_upload};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Uploading,
    Completed(BatchArtifact),
    Failed(BatchError),
}

/// Drives a CSV through one of the batch endpoints and holds the result
/// until it is replaced, removed or saved.
pub struct BatchAnalyzer {
    client: ServiceClient,
    notifier: Arc<dyn Notifier>,
    selected: Option<UploadFile>,
    state: BatchState,
    abort: AbortSlot,
}

impl BatchAnalyzer {
    pub fn new(client: ServiceClient) -> Self {
        Self {
            notifier: client.notifier(),
            client,
            selected: None,
            state: BatchState::Idle,
            abort: AbortSlot::default(),
        }
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, BatchState::Uploading)
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected.as_ref()
    }

    pub fn artifact(&self) -> Option<&BatchArtifact> {
        match &self.state {
            BatchState::Completed(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.handle()
    }

    /// Accepts `file` for the next run if it is a CSV within the size limit.
    /// A rejected file leaves the current selection in place.
    pub fn select_file(&mut self, file: UploadFile) -> Result<(), BatchError> {
        if let Err(error) = validate_csv_upload(&file) {
            self.notifier.notify(Notification::error(error.to_string()));
            return Err(error.into());
        }

        debug!("Selected {:?}", file);
        self.selected = Some(file);
        self.state = BatchState::Idle;
        self.notifier
            .notify(Notification::success("File uploaded successfully!"));
        Ok(())
    }

    /// Forgets the selected file and any result, whatever state the analyzer is in.
    pub fn remove_file(&mut self) {
        self.selected = None;
        self.state = BatchState::Idle;
    }

    pub async fn process_full(&mut self) -> Result<(), BatchError> {
        self.process(BatchMode::Full).await
    }

    pub async fn process_quick(&mut self) -> Result<(), BatchError> {
        self.process(BatchMode::Quick).await
    }

    /// Uploads the selected file and stores the returned CSV.
    ///
    /// Every failure is reported to the notifier exactly once, timeouts and
    /// aborts as [`BatchError::ProcessingTimeout`].
    pub async fn process(&mut self, mode: BatchMode) -> Result<(), BatchError> {
        let Some(file) = &self.selected else {
            let error = ValidationError::NoFileSelected;
            self.notifier.notify(Notification::error(error.to_string()));
            return Err(error.into());
        };

        let job = BatchUploadJob::new(file.clone(), mode);
        let abort = self.abort.arm();
        let in_flight = InFlight::start(
            &mut self.state,
            BatchState::Uploading,
            BatchState::Failed(BatchError::Cancelled),
        );

        info!(target: "user", "Processing {} in {} mode", job.file.name, mode);

        match self.client.batch_upload(&job, Some(&abort)).await {
            Ok(artifact) => {
                in_flight.settle(BatchState::Completed(artifact));
                self.notifier
                    .notify(Notification::success(completion_message(mode)));
                Ok(())
            }
            Err(error) => {
                let error = BatchError::from_service(error);
                in_flight.settle(BatchState::Failed(error.clone()));
                self.notifier.notify(Notification::error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Saves the completed result into `dir` as `text_analysis_results.csv`.
    /// Can be repeated; every call writes the same bytes.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf, BatchError> {
        let Some(artifact) = self.artifact() else {
            return Err(BatchError::NothingToDownload);
        };

        let path = artifact
            .save_to(dir)
            .await
            .map_err(|e| BatchError::Save {
                path: dir.join(artifact.file_name()),
                reason: e.to_string(),
            })?;

        self.notifier.notify(Notification::success(format!(
            "Results saved to {}",
            path.display()
        )));
        Ok(path)
    }
}

fn completion_message(mode: BatchMode) -> &'static str {
    match mode {
        BatchMode::Full => "Batch analysis completed successfully!",
        BatchMode::Quick => "Quick batch analysis completed!",
    }
}
