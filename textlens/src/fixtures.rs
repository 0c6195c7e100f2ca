use crate::shared::prelude::{Notification, NotificationKind, Notifier};
use crate::transport::prelude::{OutboundRequest, ResponsePayload, Transport, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

pub(crate) const SAMPLE_CSV: &[u8] = b"text\n\
The acting was amazing but the story was boring\n\
Great soundtrack and beautiful cinematography\n";

pub(crate) fn sample_result_json() -> serde_json::Value {
    json!({
        "text": "The acting was amazing but the story was boring",
        "sentiment": {
            "label": "Positive",
            "confidence": 0.62,
            "scores": {"positive": 0.412, "negative": 0.178, "neutral": 0.41}
        },
        "topics": ["Acting", "Story"],
        "aspects": {
            "acting": "Positive",
            "story": "Negative",
            "music": "Neutral",
            "direction": "Neutral"
        },
        "emotion": {
            "label": "Happy",
            "confidence": 0.71,
            "scores": {"happy": 0.55, "sad": 0.15, "angry": 0.1, "neutral": 0.2}
        },
        "text_analysis": {
            "length": 47,
            "word_count": 9,
            "sentence_count": 1,
            "tone": "Casual",
            "formality": "Informal",
            "sentiment_strength": "Moderate",
            "complexity": "Simple"
        },
        "keywords": ["acting", "amazing", "story", "boring"]
    })
}

/// Never answers.
pub(crate) struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn send(&self, _request: OutboundRequest) -> Result<ResponsePayload, TransportError> {
        std::future::pending().await
    }
}

/// Keeps every notification for later assertions.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn messages(&self, kind: NotificationKind) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message)
            .collect()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.messages(NotificationKind::Error)
    }

    pub(crate) fn successes(&self) -> Vec<String> {
        self.messages(NotificationKind::Success)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
