use crate::models::prelude::{
    AnalysisRequest, AnalysisResult, BatchArtifact, BatchUploadJob, HealthStatus,
    SentimentResult, TopicsResult, UploadDiagnostic, UploadFile,
};
use crate::shared::prelude::{FoundConfig, Notification, Notifier};
use crate::transport::abort::AbortHandle;
use crate::transport::endpoint::{Endpoint, TimeoutPolicy};
use crate::transport::error::{ServiceError, TransportError};
use crate::transport::http::HttpTransport;
use crate::transport::request::{OutboundRequest, RequestBody, ResponsePayload, Transport};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

const UPLOAD_FIELD: &str = "file";

/// Typed access to every endpoint of the classification service.
///
/// Each call logs the outbound request, enforces the endpoint's deadline,
/// honours an optional [`AbortHandle`] and normalizes failures into a
/// [`ServiceError`]. JSON endpoint failures are also sent to the notifier;
/// batch failures are left to the caller to report.
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    timeouts: TimeoutPolicy,
}

impl ServiceClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        timeouts: TimeoutPolicy,
    ) -> Self {
        Self {
            transport,
            notifier,
            timeouts,
        }
    }

    pub fn from_config(
        config: &FoundConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.api_url)?;
        Ok(Self::new(Arc::new(transport), notifier, config.timeouts))
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub async fn classify(
        &self,
        request: &AnalysisRequest,
        abort: Option<&AbortHandle>,
    ) -> Result<AnalysisResult, ServiceError> {
        self.call(Endpoint::Classify, text_body(request), abort, |payload| {
            let result: AnalysisResult = decode_json(payload)?;
            result.check_ranges().map_err(TransportError::Malformed)?;
            Ok(result)
        })
        .await
    }

    pub async fn sentiment_only(
        &self,
        request: &AnalysisRequest,
        abort: Option<&AbortHandle>,
    ) -> Result<SentimentResult, ServiceError> {
        self.call(Endpoint::SentimentOnly, text_body(request), abort, |payload| {
            let result: SentimentResult = decode_json(payload)?;
            result.check_ranges().map_err(TransportError::Malformed)?;
            Ok(result)
        })
        .await
    }

    pub async fn topics_only(
        &self,
        request: &AnalysisRequest,
        abort: Option<&AbortHandle>,
    ) -> Result<TopicsResult, ServiceError> {
        self.call(Endpoint::TopicsOnly, text_body(request), abort, decode_json)
            .await
    }

    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.call(Endpoint::Health, RequestBody::Empty, None, decode_json)
            .await
    }

    pub async fn debug_upload(&self, file: &UploadFile) -> Result<UploadDiagnostic, ServiceError> {
        self.call(
            Endpoint::DebugUpload,
            upload_body(file),
            None,
            decode_json,
        )
        .await
    }

    /// Uploads a CSV to the endpoint matching the job's mode and returns the
    /// file the service produced. Failures are not sent to the notifier.
    pub async fn batch_upload(
        &self,
        job: &BatchUploadJob,
        abort: Option<&AbortHandle>,
    ) -> Result<BatchArtifact, ServiceError> {
        let endpoint = Endpoint::for_batch(job.mode);
        self.call(endpoint, upload_body(&job.file), abort, |payload| {
            match payload {
                ResponsePayload::Binary(contents) => Ok(BatchArtifact::new(contents)),
                ResponsePayload::Json(_) => Err(TransportError::Malformed(
                    "expected a file, got JSON".to_string(),
                )),
            }
        })
        .await
    }

    async fn call<T, F>(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
        abort: Option<&AbortHandle>,
        decode: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce(ResponsePayload) -> Result<T, TransportError>,
    {
        let outcome = self.dispatch(endpoint, body, abort).await.and_then(decode);

        outcome.map_err(|cause| {
            let error = ServiceError::from(cause);
            warn!(
                "API Error: {} {} failed: {} ({:?})",
                endpoint.method(),
                endpoint.path(),
                error.message,
                error.cause
            );
            if endpoint.surfaces_failures() {
                self.notifier.notify(Notification::error(&error.message));
            }
            error
        })
    }

    async fn dispatch(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
        abort: Option<&AbortHandle>,
    ) -> Result<ResponsePayload, TransportError> {
        let request = OutboundRequest {
            method: endpoint.method(),
            path: endpoint.path(),
            body,
            timeout: endpoint.timeout(&self.timeouts),
            response: endpoint.response_kind(),
        };
        let path = request.path;
        let deadline = request.timeout;

        info!("API Request: {} {}", request.method, path);

        let send = async {
            tokio::time::timeout(deadline, self.transport.send(request))
                .await
                .unwrap_or_else(|_| {
                    Err(TransportError::Timeout {
                        path: path.to_string(),
                        after: deadline,
                    })
                })
        };

        let result = match abort {
            Some(handle) => {
                tokio::select! {
                    biased;
                    _ = handle.aborted() => Err(TransportError::Aborted { path: path.to_string() }),
                    result = send => result,
                }
            }
            None => send.await,
        };

        if result.is_ok() {
            debug!("API Response: {} completed", path);
        }
        result
    }
}

fn text_body(request: &AnalysisRequest) -> RequestBody {
    RequestBody::Json(json!(request))
}

fn upload_body(file: &UploadFile) -> RequestBody {
    RequestBody::Multipart {
        field: UPLOAD_FIELD,
        file: file.clone(),
    }
}

fn decode_json<T: DeserializeOwned>(payload: ResponsePayload) -> Result<T, TransportError> {
    match payload {
        ResponsePayload::Json(value) => {
            serde_json::from_value(value).map_err(|e| TransportError::Malformed(e.to_string()))
        }
        ResponsePayload::Binary(_) => Err(TransportError::Malformed(
            "expected JSON, got a file".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{RecordingNotifier, StalledTransport, sample_result_json};
    use crate::models::prelude::BatchMode;
    use crate::shared::prelude::MockNotifier;
    use crate::transport::request::{HttpMethod, MockTransport, ResponseKind};
    use std::time::Duration;

    fn client_with(transport: MockTransport, notifier: MockNotifier) -> ServiceClient {
        ServiceClient::new(
            Arc::new(transport),
            Arc::new(notifier),
            TimeoutPolicy::default(),
        )
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("the soundtrack was dull")
    }

    fn silent_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        notifier
    }

    #[tokio::test]
    async fn test_classify_posts_text_and_decodes_result() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Post
                    && request.path == "/classify"
                    && request.timeout == Duration::from_secs(30)
                    && request.response == ResponseKind::Json
                    && request.body
                        == RequestBody::Json(
                            json!({"text": "The acting was amazing but the story was boring"}),
                        )
            })
            .times(1)
            .returning(|_| Ok(ResponsePayload::Json(sample_result_json())));

        let client = client_with(transport, silent_notifier());
        let result = client
            .classify(
                &AnalysisRequest::new("The acting was amazing but the story was boring"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(vec!["Acting", "Story"], result.topics);
        assert!(!result.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_field_is_notified_once() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Err(TransportError::Status {
                status: 400,
                error: Some("No text provided".to_string()),
            })
        });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.is_error() && n.message == "No text provided")
            .times(1)
            .return_const(());

        let client = client_with(transport, notifier);
        let err = client.classify(&request(), None).await.unwrap_err();

        assert_eq!("No text provided", err.message);
        assert_eq!(
            TransportError::Status {
                status: 400,
                error: Some("No text provided".to_string())
            },
            err.cause
        );
    }

    #[tokio::test]
    async fn test_out_of_range_result_is_malformed() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| {
            let mut value = sample_result_json();
            value["sentiment"]["confidence"] = json!(1.5);
            Ok(ResponsePayload::Json(value))
        });

        let notifier = Arc::new(RecordingNotifier::default());
        let client = ServiceClient::new(
            Arc::new(transport),
            notifier.clone(),
            TimeoutPolicy::default(),
        );
        let err = client.classify(&request(), None).await.unwrap_err();

        assert!(matches!(err.cause, TransportError::Malformed(_)));
        assert_eq!(1, notifier.errors().len());
    }

    #[tokio::test]
    async fn test_partial_endpoints_use_their_own_shapes() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "/sentiment-only")
            .times(1)
            .returning(|_| {
                Ok(ResponsePayload::Json(json!({
                    "label": "Negative",
                    "confidence": 0.8,
                    "scores": {"positive": 0.1, "negative": 0.8, "neutral": 0.1}
                })))
            });
        transport
            .expect_send()
            .withf(|request| request.path == "/topics-only")
            .times(1)
            .returning(|_| Ok(ResponsePayload::Json(json!({"topics": ["Music"]}))));

        let client = client_with(transport, silent_notifier());

        let sentiment = client.sentiment_only(&request(), None).await.unwrap();
        assert_eq!(0.8, sentiment.scores.negative);

        let topics = client.topics_only(&request(), None).await.unwrap();
        assert_eq!(vec!["Music"], topics.topics);
    }

    #[tokio::test]
    async fn test_health_is_a_get_without_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.method == HttpMethod::Get
                    && request.path == "/health"
                    && request.body == RequestBody::Empty
            })
            .times(1)
            .returning(|_| {
                Ok(ResponsePayload::Json(
                    json!({"status": "healthy", "message": "Text Classification API is running"}),
                ))
            });

        let client = client_with(transport, silent_notifier());
        assert!(client.health().await.unwrap().is_healthy());
    }

    #[tokio::test]
    async fn test_batch_upload_sends_file_field_and_keeps_quiet_on_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| {
                request.path == "/simple-batch"
                    && request.timeout == Duration::from_secs(60)
                    && request.response == ResponseKind::Binary
                    && matches!(
                        &request.body,
                        RequestBody::Multipart { field: "file", file } if file.name == "reviews.csv"
                    )
            })
            .times(1)
            .returning(|_| {
                Err(TransportError::Status {
                    status: 500,
                    error: None,
                })
            });

        let client = client_with(transport, silent_notifier());
        let job = BatchUploadJob::new(
            UploadFile::new("reviews.csv", b"text\nfine\n".to_vec()),
            BatchMode::Quick,
        );
        let err = client.batch_upload(&job, None).await.unwrap_err();

        assert_eq!("Request failed with status code 500", err.message);
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_batch_upload_returns_binary_artifact() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|request| request.path == "/batch-analyze")
            .times(1)
            .returning(|_| Ok(ResponsePayload::Binary(b"ID,Text\n1,ok\n".to_vec())));

        let client = client_with(transport, silent_notifier());
        let job = BatchUploadJob::new(
            UploadFile::new("reviews.csv", b"text\nok\n".to_vec()),
            BatchMode::Full,
        );
        let artifact = client.batch_upload(&job, None).await.unwrap();

        assert_eq!(b"ID,Text\n1,ok\n", artifact.contents());
        assert_eq!("text_analysis_results.csv", artifact.file_name());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_transport_times_out_at_endpoint_deadline() {
        let notifier = Arc::new(RecordingNotifier::default());
        let client = ServiceClient::new(
            Arc::new(StalledTransport),
            notifier.clone(),
            TimeoutPolicy::default(),
        );

        let started = tokio::time::Instant::now();
        let err = client.classify(&request(), None).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!("timeout of 30000ms exceeded", err.message);
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(vec!["timeout of 30000ms exceeded"], notifier.errors());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_cancels_pending_request() {
        let client = ServiceClient::new(
            Arc::new(StalledTransport),
            Arc::new(RecordingNotifier::default()),
            TimeoutPolicy::default(),
        );
        let handle = AbortHandle::default();

        let aborter = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            aborter.abort();
        });

        let job = BatchUploadJob::new(
            UploadFile::new("reviews.csv", b"text\nok\n".to_vec()),
            BatchMode::Full,
        );
        let err = client.batch_upload(&job, Some(&handle)).await.unwrap_err();

        assert_eq!(
            TransportError::Aborted {
                path: "/batch-analyze".to_string()
            },
            err.cause
        );
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_binary_payload_on_json_endpoint_is_malformed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ResponsePayload::Binary(vec![1, 2, 3])));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).return_const(());

        let client = client_with(transport, notifier);
        let err = client.topics_only(&request(), None).await.unwrap_err();
        assert!(matches!(err.cause, TransportError::Malformed(_)));
    }
}
