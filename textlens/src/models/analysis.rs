use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

/// Body of every single-text endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter, EnumString,
)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter, EnumString,
)]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Neutral,
}

/// Per-label scores. The service reports these keyed by the lower-cased label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    pub fn get(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub neutral: f64,
}

impl EmotionScores {
    pub fn get(&self, label: EmotionLabel) -> f64 {
        match label {
            EmotionLabel::Happy => self.happy,
            EmotionLabel::Sad => self.sad,
            EmotionLabel::Angry => self.angry,
            EmotionLabel::Neutral => self.neutral,
        }
    }
}

/// Response of `/sentiment-only`, also embedded in the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub scores: SentimentScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub label: EmotionLabel,
    pub confidence: f64,
    pub scores: EmotionScores,
}

/// Response of `/topics-only`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsResult {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub length: u64,
    pub word_count: u64,
    pub sentence_count: u64,
    pub tone: String,
    pub formality: String,
    pub sentiment_strength: String,
    pub complexity: String,
}

/// Response of `/classify`.
///
/// `topics` and `keywords` keep the order the service returned them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub sentiment: SentimentResult,
    pub topics: Vec<String>,
    pub aspects: BTreeMap<String, SentimentLabel>,
    pub emotion: EmotionResult,
    pub text_analysis: TextMetrics,
    pub keywords: Vec<String>,
}

fn check_unit(field: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be within [0, 1], got {value}"))
    }
}

impl SentimentResult {
    /// Checks that the confidence and every score are probabilities.
    pub fn check_ranges(&self) -> Result<(), String> {
        check_unit("sentiment.confidence", self.confidence)?;
        check_unit("sentiment.scores.positive", self.scores.positive)?;
        check_unit("sentiment.scores.negative", self.scores.negative)?;
        check_unit("sentiment.scores.neutral", self.scores.neutral)
    }
}

impl EmotionResult {
    pub fn check_ranges(&self) -> Result<(), String> {
        check_unit("emotion.confidence", self.confidence)?;
        check_unit("emotion.scores.happy", self.scores.happy)?;
        check_unit("emotion.scores.sad", self.scores.sad)?;
        check_unit("emotion.scores.angry", self.scores.angry)?;
        check_unit("emotion.scores.neutral", self.scores.neutral)
    }
}

impl AnalysisResult {
    pub fn check_ranges(&self) -> Result<(), String> {
        self.sentiment.check_ranges()?;
        self.emotion.check_ranges()
    }
}
