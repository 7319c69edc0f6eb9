//! Session coordinator: UI state transitions around the form and the transport.

use std::sync::Arc;

use client_core::{ClientError, SentimentTransport};
use shared::protocol::{HealthStatus, PredictionResult, ReviewInput};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::form::{FieldError, FormField, Preset, ReviewForm};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Result(PredictionResult),
    Error(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Result(_) => "result",
            UiState::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("a prediction is already in progress")]
    Busy,
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Owns the editable form and hands validated snapshots to the transport.
pub struct FormController {
    transport: Arc<dyn SentimentTransport>,
    form: ReviewForm,
    field_errors: Vec<FieldError>,
}

impl FormController {
    pub fn new(transport: Arc<dyn SentimentTransport>) -> Self {
        Self {
            transport,
            form: ReviewForm::default(),
            field_errors: Vec::new(),
        }
    }

    pub fn form(&self) -> &ReviewForm {
        &self.form
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn transport(&self) -> Arc<dyn SentimentTransport> {
        Arc::clone(&self.transport)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
        self.field_errors.retain(|err| err.field != field);
    }

    pub fn load_preset(&mut self, preset: Preset) {
        self.form = ReviewForm::preset(preset);
        self.field_errors.clear();
    }

    pub fn clear(&mut self) {
        self.form = ReviewForm::default();
        self.field_errors.clear();
    }

    fn prepare(&mut self) -> Result<ReviewInput, Vec<FieldError>> {
        match self.form.validate() {
            Ok(input) => {
                self.field_errors.clear();
                Ok(input)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(errors)
            }
        }
    }
}

/// Top-level coordinator; the only owner of [`UiState`].
pub struct Session {
    controller: FormController,
    state: UiState,
    health: Option<HealthStatus>,
}

impl Session {
    pub fn new(transport: Arc<dyn SentimentTransport>) -> Self {
        Self {
            controller: FormController::new(transport),
            state: UiState::Idle,
            health: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }

    /// Field edits stay possible while a prediction is pending.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.controller.set_field(field, value);
    }

    pub fn load_preset(&mut self, preset: Preset) -> Result<(), FormError> {
        self.ensure_not_loading()?;
        self.controller.load_preset(preset);
        Ok(())
    }

    pub fn clear_form(&mut self) -> Result<(), FormError> {
        self.ensure_not_loading()?;
        self.controller.clear();
        Ok(())
    }

    /// Drops the current result or error and restores default field values.
    pub fn new_analysis(&mut self) -> Result<(), FormError> {
        self.ensure_not_loading()?;
        self.controller.clear();
        self.state = UiState::Idle;
        Ok(())
    }

    /// Validates the form and moves to `Loading`; the returned snapshot is
    /// what must be sent.
    pub fn begin_submit(&mut self) -> Result<ReviewInput, FormError> {
        self.ensure_not_loading()?;
        let input = self.controller.prepare().map_err(|errors| {
            debug!(errors = errors.len(), "form: submission rejected");
            FormError::Invalid(errors)
        })?;
        self.state = UiState::Loading;
        Ok(input)
    }

    pub fn finish_submit(&mut self, outcome: Result<PredictionResult, ClientError>) {
        if !self.state.is_loading() {
            warn!(
                state = self.state.label(),
                "form: ignoring outcome with no pending submission"
            );
            return;
        }
        self.state = match outcome {
            Ok(result) => {
                info!(
                    overall = %result.overall_prediction,
                    models = result.predictions.len(),
                    "form: prediction complete"
                );
                UiState::Result(result)
            }
            Err(err) => {
                warn!(error = %err, "form: prediction failed");
                UiState::Error(err.to_string())
            }
        };
    }

    pub async fn submit(&mut self) -> Result<(), FormError> {
        let input = self.begin_submit()?;
        let transport = self.controller.transport();
        let outcome = transport.predict_sentiment(&input).await;
        self.finish_submit(outcome);
        Ok(())
    }

    pub async fn refresh_health(&mut self) -> &HealthStatus {
        let health = self.controller.transport().check_health().await;
        self.set_health(health)
    }

    pub fn set_health(&mut self, health: HealthStatus) -> &HealthStatus {
        if !health.is_healthy() {
            warn!(
                detail = health.message.as_deref().unwrap_or_default(),
                "health: api unhealthy"
            );
        }
        self.health.insert(health)
    }

    fn ensure_not_loading(&self) -> Result<(), FormError> {
        if self.state.is_loading() {
            return Err(FormError::Busy);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
