use serde::{Deserialize, Serialize};

use crate::domain::{Genre, HealthState, Language, Rating, Sentiment};

pub const HEALTH_PATH: &str = "/api/v1/health";
pub const MODEL_INFO_PATH: &str = "/api/v1/models/info";
pub const PREDICT_PATH: &str = "/api/v1/predict";
pub const RETRAIN_PATH: &str = "/api/v1/models/retrain";

/// Review attributes submitted for prediction. Also echoed back as `input_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub review_text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub original_language: Option<Language>,
    #[serde(default)]
    pub distributor: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub audience_score: Option<f64>,
}

impl ReviewInput {
    pub fn new(review_text: impl Into<String>) -> Self {
        Self {
            review_text: review_text.into(),
            ..Self::default()
        }
    }

    /// Trims every string field; blank optionals become `None`.
    pub fn normalized(&self) -> Self {
        Self {
            review_text: self.review_text.trim().to_string(),
            title: trimmed(&self.title),
            rating: self.rating,
            genre: self.genre,
            reviewer_name: trimmed(&self.reviewer_name),
            original_language: self.original_language,
            distributor: trimmed(&self.distributor),
            director: trimmed(&self.director),
            audience_score: self.audience_score,
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub model_name: String,
    pub prediction: Sentiment,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub overall_prediction: Sentiment,
    pub predictions: Vec<ModelPrediction>,
    pub input_data: ReviewInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Unhealthy,
            message: Some(message.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelInfo(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrainStatus(pub serde_json::Value);
