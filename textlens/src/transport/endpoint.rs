use crate::models::prelude::BatchMode;
use crate::transport::request::{HttpMethod, ResponseKind};
use derive_builder::Builder;
use std::time::Duration;
use strum::EnumIter;

/// Per-kind request deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct TimeoutPolicy {
    /// JSON endpoints, health and debug uploads.
    pub request: Duration,
    pub quick_batch: Duration,
    pub full_batch: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            request: Duration::from_millis(30_000),
            quick_batch: Duration::from_millis(60_000),
            full_batch: Duration::from_millis(300_000),
        }
    }
}

/// Every route of the classification service this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Endpoint {
    Classify,
    SentimentOnly,
    TopicsOnly,
    BatchAnalyze,
    SimpleBatch,
    DebugUpload,
    Health,
}

impl Endpoint {
    pub fn for_batch(mode: BatchMode) -> Self {
        match mode {
            BatchMode::Full => Endpoint::BatchAnalyze,
            BatchMode::Quick => Endpoint::SimpleBatch,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Classify => "/classify",
            Endpoint::SentimentOnly => "/sentiment-only",
            Endpoint::TopicsOnly => "/topics-only",
            Endpoint::BatchAnalyze => "/batch-analyze",
            Endpoint::SimpleBatch => "/simple-batch",
            Endpoint::DebugUpload => "/debug-upload",
            Endpoint::Health => "/health",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::Health => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    pub fn response_kind(self) -> ResponseKind {
        match self {
            Endpoint::BatchAnalyze | Endpoint::SimpleBatch => ResponseKind::Binary,
            _ => ResponseKind::Json,
        }
    }

    pub fn timeout(self, policy: &TimeoutPolicy) -> Duration {
        match self {
            Endpoint::BatchAnalyze => policy.full_batch,
            Endpoint::SimpleBatch => policy.quick_batch,
            _ => policy.request,
        }
    }

    /// Whether the service client notifies the user itself when this call fails.
    /// Batch failures are classified and reported by the batch orchestrator.
    pub fn surfaces_failures(self) -> bool {
        !matches!(self, Endpoint::BatchAnalyze | Endpoint::SimpleBatch)
    }
}
