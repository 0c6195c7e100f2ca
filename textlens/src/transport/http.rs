use crate::transport::error::TransportError;
use crate::transport::request::{
    HttpMethod, OutboundRequest, RequestBody, ResponseKind, ResponsePayload, Transport,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_millis(30_000);
const CSV_MIME: &str = "text/csv";

/// [`Transport`] backed by reqwest.
///
/// Paths are appended to the base address as-is, so a base of
/// `https://host/api` sends `/classify` to `https://host/api/classify`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &Url) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_CLIENT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn classify_reqwest_error(error: reqwest::Error, request: &OutboundRequest) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            path: request.path.to_string(),
            after: request.timeout,
        }
    } else {
        TransportError::Network(error.to_string())
    }
}

/// Pulls the `error` string out of a JSON error body.
pub(crate) fn extract_error_field(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()?
        .error
        .filter(|error| !error.trim().is_empty())
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<ResponsePayload, TransportError> {
        let url = self.url_for(request.path);
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .timeout(request.timeout);

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart { field, file } => {
                let part = Part::bytes(file.contents.clone())
                    .file_name(file.name.clone())
                    .mime_str(CSV_MIME)
                    .map_err(|e| classify_reqwest_error(e, &request))?;
                builder.multipart(Form::new().part(*field, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, &request))?;

        let status = response.status();
        debug!(path = request.path, status = status.as_u16(), "API Response");

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                error: extract_error_field(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(e, &request))?;

        match request.response {
            ResponseKind::Json => serde_json::from_slice(&body)
                .map(ResponsePayload::Json)
                .map_err(|e| TransportError::Malformed(e.to_string())),
            ResponseKind::Binary => Ok(ResponsePayload::Binary(body.to_vec())),
        }
    }
}
