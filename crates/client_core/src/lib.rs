use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    HealthStatus, ModelInfo, PredictionResult, RetrainStatus, ReviewInput, HEALTH_PATH,
    MODEL_INFO_PATH, PREDICT_PATH, RETRAIN_PATH,
};
use tracing::{debug, warn};

pub mod error;
pub mod observer;

pub use error::ClientError;
pub use observer::{HttpEvent, NoopObserver, RequestObserver, TracingObserver};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Calls the form and the CLI make against the prediction service.
#[async_trait]
pub trait SentimentTransport: Send + Sync {
    /// Never fails; an unreachable service is reported as unhealthy.
    async fn check_health(&self) -> HealthStatus;
    async fn predict_sentiment(
        &self,
        input: &ReviewInput,
    ) -> Result<PredictionResult, ClientError>;
    async fn get_model_info(&self) -> Result<ModelInfo, ClientError>;
    async fn retrain_models(&self) -> Result<RetrainStatus, ClientError>;
}

pub struct SentimentClient {
    http: Client,
    base_url: String,
    observer: Arc<dyn RequestObserver>,
}

impl SentimentClient {
    pub fn new(
        base_url: impl Into<String>,
        observer: Arc<dyn RequestObserver>,
    ) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, observer, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        observer: Arc<dyn RequestObserver>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Setup(err.to_string()))?;
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            observer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        self.observer.observe(&HttpEvent::Request {
            method: &method,
            url: &url,
        });

        let mut request = self.http.request(method.clone(), url.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        let outcome = match request.send().await {
            Ok(response) => self.read_response(&method, &url, response).await,
            Err(err) => Err(ClientError::from_transport(&err)),
        };

        if let Err(error) = &outcome {
            self.observer.observe(&HttpEvent::Failed {
                method: &method,
                url: &url,
                error,
            });
        }
        outcome
    }

    async fn read_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        response: Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        self.observer.observe(&HttpEvent::Response {
            method,
            url,
            status,
        });

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| ClientError::from_transport(&err))?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl SentimentTransport for SentimentClient {
    async fn check_health(&self) -> HealthStatus {
        match self
            .execute::<(), HealthStatus>(Method::GET, HEALTH_PATH, None)
            .await
        {
            Ok(health) => health,
            Err(err) => {
                let err = ClientError::HealthCheck(err.to_string());
                warn!(base_url = %self.base_url, error = %err, "health: service unavailable");
                HealthStatus::unhealthy(err.to_string())
            }
        }
    }

    async fn predict_sentiment(
        &self,
        input: &ReviewInput,
    ) -> Result<PredictionResult, ClientError> {
        let payload = input.normalized();
        if payload.review_text.is_empty() {
            return Err(ClientError::Validation("Review text is required".into()));
        }

        debug!(
            review_chars = payload.review_text.chars().count(),
            title = payload.title.as_deref().unwrap_or_default(),
            "predict: sending review"
        );
        let result: PredictionResult = self
            .execute(Method::POST, PREDICT_PATH, Some(&payload))
            .await?;

        if result.predictions.is_empty() {
            return Err(ClientError::Decode(
                "prediction response contained no model predictions".into(),
            ));
        }
        debug!(
            overall = %result.overall_prediction,
            models = result.predictions.len(),
            "predict: result received"
        );
        Ok(result)
    }

    async fn get_model_info(&self) -> Result<ModelInfo, ClientError> {
        self.execute::<(), ModelInfo>(Method::GET, MODEL_INFO_PATH, None)
            .await
            .map_err(|err| ClientError::ModelInfo(err.to_string()))
    }

    async fn retrain_models(&self) -> Result<RetrainStatus, ClientError> {
        self.execute::<(), RetrainStatus>(Method::POST, RETRAIN_PATH, None)
            .await
            .map_err(|err| ClientError::Retrain(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
