use crate::models::prelude::UploadFile;
use crate::transport::error::TransportError;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// A single file part. Replaces the default JSON content type.
    Multipart {
        field: &'static str,
        file: UploadFile,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Binary,
}

/// Everything a [`Transport`] needs to perform one call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub path: &'static str,
    pub body: RequestBody,
    pub timeout: Duration,
    pub response: ResponseKind,
}

/// The unwrapped body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

/// Performs a single request against the service.
///
/// Implementations report failures as [`TransportError`] and do nothing
/// else; logging, deadlines, aborts and user notification are layered on
/// top by [`ServiceClient`](super::client::ServiceClient).
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<ResponsePayload, TransportError>;
}
