use crate::models::prelude::{
    AnalysisResult, EmotionLabel, EmotionResult, SentimentLabel, SentimentResult,
};
use serde::Serialize;
use strum::IntoEnumIterator;

/// A predicted label and how sure the service was about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelView {
    pub label: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub name: &'static str,
    pub value: String,
}

/// Display fields for an [`AnalysisResult`]. Nothing is computed beyond
/// formatting; topics and keywords keep the service's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub text: String,
    pub sentiment: LabelView,
    pub sentiment_scores: Vec<ScoreRow>,
    pub topics: Vec<String>,
    pub aspects: Vec<ScoreRow>,
    pub emotion: LabelView,
    pub emotion_scores: Vec<ScoreRow>,
    pub metrics: Vec<MetricRow>,
    pub keywords: Vec<String>,
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl LabelView {
    pub fn sentiment(result: &SentimentResult) -> Self {
        Self {
            label: result.label.to_string(),
            confidence: percent(result.confidence),
        }
    }

    pub fn emotion(result: &EmotionResult) -> Self {
        Self {
            label: result.label.to_string(),
            confidence: percent(result.confidence),
        }
    }
}

impl ScoreRow {
    /// Raw sentiment scores, three decimals.
    pub fn sentiment_scores(result: &SentimentResult) -> Vec<Self> {
        SentimentLabel::iter()
            .map(|label| Self {
                name: label.to_string().to_lowercase(),
                value: format!("{:.3}", result.scores.get(label)),
            })
            .collect()
    }

    /// Emotion distribution as percentages.
    pub fn emotion_scores(result: &EmotionResult) -> Vec<Self> {
        EmotionLabel::iter()
            .map(|label| Self {
                name: label.to_string().to_lowercase(),
                value: percent(result.scores.get(label)),
            })
            .collect()
    }
}

impl From<&AnalysisResult> for ResultView {
    fn from(result: &AnalysisResult) -> Self {
        let metrics = &result.text_analysis;

        Self {
            text: result.text.clone(),
            sentiment: LabelView::sentiment(&result.sentiment),
            sentiment_scores: ScoreRow::sentiment_scores(&result.sentiment),
            topics: result.topics.clone(),
            aspects: result
                .aspects
                .iter()
                .map(|(aspect, label)| ScoreRow {
                    name: capitalize(aspect),
                    value: label.to_string(),
                })
                .collect(),
            emotion: LabelView::emotion(&result.emotion),
            emotion_scores: ScoreRow::emotion_scores(&result.emotion),
            metrics: vec![
                MetricRow {
                    name: "Characters",
                    value: metrics.length.to_string(),
                },
                MetricRow {
                    name: "Words",
                    value: metrics.word_count.to_string(),
                },
                MetricRow {
                    name: "Sentences",
                    value: metrics.sentence_count.to_string(),
                },
                MetricRow {
                    name: "Tone",
                    value: metrics.tone.clone(),
                },
                MetricRow {
                    name: "Formality",
                    value: metrics.formality.clone(),
                },
                MetricRow {
                    name: "Sentiment Strength",
                    value: metrics.sentiment_strength.clone(),
                },
                MetricRow {
                    name: "Complexity",
                    value: metrics.complexity.clone(),
                },
            ],
            keywords: result.keywords.clone(),
        }
    }
}
