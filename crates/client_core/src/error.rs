use reqwest::StatusCode;
use shared::error::ValidationErrorBody;
use thiserror::Error;

/// Classified failure of a call to the prediction service.
///
/// Low-level transport errors never leave this crate; they are mapped onto one
/// of these variants and their original text is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("Server Error: Please try again later")]
    Server { status: u16 },
    #[error("Request timeout: The prediction is taking too long")]
    Timeout,
    #[error("Network Error: Cannot connect to the server")]
    Network,
    #[error("Request failed with status code {status}")]
    Status { status: u16 },
    #[error("Invalid response from server: {0}")]
    Decode(String),
    #[error("Health check failed: {0}")]
    HealthCheck(String),
    #[error("Failed to get model info: {0}")]
    ModelInfo(String),
    #[error("Model retraining failed: {0}")]
    Retrain(String),
    #[error("failed to build http client: {0}")]
    Setup(String),
}

impl ClientError {
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_builder() {
            ClientError::Setup(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = serde_json::from_str::<ValidationErrorBody>(body)
                .map(|body| body.summary())
                .unwrap_or_else(|_| body.trim().to_string());
            ClientError::Validation(message)
        } else if status.is_server_error() {
            ClientError::Server {
                status: status.as_u16(),
            }
        } else {
            ClientError::Status {
                status: status.as_u16(),
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
