use crate::analyze::error::AnalyzeError;
use crate::models::prelude::{AnalysisRequest, AnalysisResult, SentimentResult, TopicsResult};
use crate::shared::prelude::{Notification, Notifier};
use crate::transport::prelude::{AbortHandle, ServiceClient};
use crate::transport::{AbortSlot, InFlight};
use crate::validation::prelude::validate_text;
use std::sync::Arc;
use tracing::debug;

const ABANDONED_MESSAGE: &str = "Analysis was cancelled before it finished";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    /// The message the user was shown.
    Failed(String),
}

/// Drives a single piece of text through `/classify`.
///
/// Only one submission runs at a time: [`TextAnalyzer::submit`] borrows the
/// analyzer mutably for as long as the request is in flight.
pub struct TextAnalyzer {
    client: ServiceClient,
    notifier: Arc<dyn Notifier>,
    state: SubmissionState,
    abort: AbortSlot,
}

impl TextAnalyzer {
    pub fn new(client: ServiceClient) -> Self {
        Self {
            notifier: client.notifier(),
            client,
            state: SubmissionState::Idle,
            abort: AbortSlot::default(),
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Cancels the submission that is running, or the next one if taken
    /// while idle and fired after it starts.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.handle()
    }

    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }

    /// Validates `text`, sends it to the service and stores the result.
    ///
    /// Rejected input is reported to the notifier and leaves the state
    /// untouched. Service failures were already reported by the client, so
    /// they only move the analyzer to [`SubmissionState::Failed`].
    pub async fn submit(&mut self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        let request = self.validated(text)?;
        let abort = self.abort.arm();

        let in_flight = InFlight::start(
            &mut self.state,
            SubmissionState::Submitting,
            SubmissionState::Failed(ABANDONED_MESSAGE.to_string()),
        );

        match self.client.classify(&request, Some(&abort)).await {
            Ok(result) => {
                debug!("Analysis succeeded with sentiment {}", result.sentiment.label);
                in_flight.settle(SubmissionState::Succeeded(result.clone()));
                Ok(result)
            }
            Err(error) => {
                in_flight.settle(SubmissionState::Failed(error.message.clone()));
                Err(error.into())
            }
        }
    }

    /// Sentiment only. Does not touch the stored result.
    pub async fn sentiment(&self, text: &str) -> Result<SentimentResult, AnalyzeError> {
        let request = self.validated(text)?;
        let abort = self.abort.arm();
        Ok(self.client.sentiment_only(&request, Some(&abort)).await?)
    }

    /// Topics only. Does not touch the stored result.
    pub async fn topics(&self, text: &str) -> Result<TopicsResult, AnalyzeError> {
        let request = self.validated(text)?;
        let abort = self.abort.arm();
        Ok(self.client.topics_only(&request, Some(&abort)).await?)
    }

    fn validated(&self, text: &str) -> Result<AnalysisRequest, AnalyzeError> {
        validate_text(text).map_err(|error| {
            self.notifier.notify(Notification::error(error.to_string()));
            AnalyzeError::Invalid(error)
        })?;
        Ok(AnalysisRequest::new(text))
    }
}
