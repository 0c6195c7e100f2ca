use std::time::Duration;
use thiserror::Error;

/// Used when neither the service nor the transport produced anything readable.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

/// Why a request to the service did not produce a usable payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timeout of {}ms exceeded", .after.as_millis())]
    Timeout { path: String, after: Duration },
    #[error("request to {path} was aborted")]
    Aborted { path: String },
    #[error("Request failed with status code {status}")]
    Status { status: u16, error: Option<String> },
    #[error("{0}")]
    Network(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// The `error` field the service put in its response body, if any.
    pub fn service_error(&self) -> Option<&str> {
        match self {
            TransportError::Status {
                error: Some(error), ..
            } if !error.trim().is_empty() => Some(error.as_str()),
            _ => None,
        }
    }

    /// True when the transport gave up waiting, either on its own deadline or
    /// because the caller aborted. Independent of anything the service sent.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout { .. } | TransportError::Aborted { .. }
        )
    }

    /// Service message, then transport text, then [`GENERIC_FAILURE_MESSAGE`].
    pub fn message(&self) -> String {
        if let Some(error) = self.service_error() {
            return error.to_string();
        }

        let transport_text = self.to_string();
        if transport_text.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            transport_text
        }
    }
}

/// A failed call, normalized for display: `message` is what the user sees,
/// `cause` is what actually went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    #[source]
    pub cause: TransportError,
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        self.cause.is_timeout()
    }
}

impl From<TransportError> for ServiceError {
    fn from(cause: TransportError) -> Self {
        Self {
            message: cause.message(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_field_wins() {
        let error = TransportError::Status {
            status: 400,
            error: Some("CSV must have a 'text' column".to_string()),
        };
        assert_eq!("CSV must have a 'text' column", error.message());
    }

    #[test]
    fn test_status_without_body_uses_transport_text() {
        let error = TransportError::Status {
            status: 500,
            error: None,
        };
        assert_eq!("Request failed with status code 500", error.message());

        let blank = TransportError::Status {
            status: 502,
            error: Some("  ".to_string()),
        };
        assert_eq!("Request failed with status code 502", blank.message());
    }

    #[test]
    fn test_empty_transport_text_falls_back_to_generic() {
        assert_eq!(
            GENERIC_FAILURE_MESSAGE,
            TransportError::Network(String::new()).message()
        );
    }

    #[test]
    fn test_timeout_classification() {
        let timeout = TransportError::Timeout {
            path: "/batch-analyze".to_string(),
            after: Duration::from_secs(300),
        };
        assert!(timeout.is_timeout());
        assert_eq!("timeout of 300000ms exceeded", timeout.message());

        let aborted = TransportError::Aborted {
            path: "/classify".to_string(),
        };
        assert!(aborted.is_timeout());

        let server = TransportError::Status {
            status: 500,
            error: Some("timeout while loading model".to_string()),
        };
        assert!(!server.is_timeout());
    }

    #[test]
    fn test_service_error_keeps_cause() {
        let cause = TransportError::Network("connection refused".to_string());
        let error = ServiceError::from(cause.clone());

        assert_eq!("connection refused", error.message);
        assert_eq!(cause, error.cause);
        assert_eq!("connection refused", error.to_string());
        assert!(!error.is_timeout());
    }
}
