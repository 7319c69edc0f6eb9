use shared::{
    domain::{Genre, Sentiment},
    protocol::{HealthStatus, ModelPrediction, PredictionResult},
};

use crate::controller::session::UiState;

pub const HIGH_THRESHOLD: f64 = 0.80;
pub const MEDIUM_THRESHOLD: f64 = 0.60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Primary,
    Danger,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Success => "success",
            Tone::Primary => "primary",
            Tone::Danger => "danger",
        }
    }
}

pub fn sentiment_tone(sentiment: Sentiment) -> Tone {
    match sentiment {
        Sentiment::Positive => Tone::Success,
        Sentiment::Negative => Tone::Danger,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ConfidenceLevel::High => Tone::Success,
            ConfidenceLevel::Medium => Tone::Primary,
            ConfidenceLevel::Low => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelAgreement {
    pub positive: usize,
    pub negative: usize,
    pub total: usize,
    pub ratio: f64,
}

impl ModelAgreement {
    /// `None` when there are no model predictions to agree on.
    pub fn from_predictions(predictions: &[ModelPrediction]) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }
        let positive = predictions
            .iter()
            .filter(|p| p.prediction == Sentiment::Positive)
            .count();
        let negative = predictions
            .iter()
            .filter(|p| p.prediction == Sentiment::Negative)
            .count();
        let total = predictions.len();
        Some(Self {
            positive,
            negative,
            total,
            ratio: positive.max(negative) as f64 / total as f64,
        })
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.ratio)
    }

    pub fn tone(&self) -> Tone {
        self.level().tone()
    }

    pub fn percent(&self) -> String {
        format!("{:.0}%", self.ratio * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRow<'a> {
    pub model_name: &'a str,
    pub sentiment: Sentiment,
    pub sentiment_tone: Tone,
    pub confidence: f64,
    pub level: ConfidenceLevel,
}

impl ModelRow<'_> {
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSummary<'a> {
    pub review_text: &'a str,
    pub title: Option<&'a str>,
    pub genre: Option<Genre>,
    pub audience_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    pub overall: Sentiment,
    pub overall_tone: Tone,
    pub rows: Vec<ModelRow<'a>>,
    pub agreement: Option<ModelAgreement>,
    pub summary: InputSummary<'a>,
}

impl<'a> ResultView<'a> {
    pub fn build(result: &'a PredictionResult) -> Self {
        let rows = result
            .predictions
            .iter()
            .map(|p| ModelRow {
                model_name: &p.model_name,
                sentiment: p.prediction,
                sentiment_tone: sentiment_tone(p.prediction),
                confidence: p.confidence,
                level: ConfidenceLevel::from_score(p.confidence),
            })
            .collect();
        let input = &result.input_data;
        Self {
            overall: result.overall_prediction,
            overall_tone: sentiment_tone(result.overall_prediction),
            rows,
            agreement: ModelAgreement::from_predictions(&result.predictions),
            summary: InputSummary {
                review_text: &input.review_text,
                title: input.title.as_deref(),
                genre: input.genre,
                audience_score: input.audience_score,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    Ready,
    Loading,
    Error(&'a str),
    Result(ResultView<'a>),
}

impl<'a> Panel<'a> {
    pub fn from_state(state: &'a UiState) -> Self {
        match state {
            UiState::Idle => Panel::Ready,
            UiState::Loading => Panel::Loading,
            UiState::Result(result) => Panel::select(Some(result), None),
            UiState::Error(message) => Panel::select(None, Some(message.as_str())),
        }
    }

    /// An error always hides a stale result.
    pub fn select(result: Option<&'a PredictionResult>, error: Option<&'a str>) -> Self {
        match (error, result) {
            (Some(message), _) => Panel::Error(message),
            (None, Some(result)) => Panel::Result(ResultView::build(result)),
            (None, None) => Panel::Ready,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthIndicator {
    pub connected: bool,
    pub tone: Tone,
    pub text: String,
}

impl HealthIndicator {
    pub fn from_status(health: &HealthStatus) -> Self {
        let connected = health.is_healthy();
        let mut text = format!(
            "API Status: {}",
            if connected { "Connected" } else { "Disconnected" }
        );
        if let Some(message) = health.message.as_deref().filter(|m| !m.is_empty()) {
            text.push_str(" - ");
            text.push_str(message);
        }
        Self {
            connected,
            tone: if connected { Tone::Success } else { Tone::Danger },
            text,
        }
    }
}
