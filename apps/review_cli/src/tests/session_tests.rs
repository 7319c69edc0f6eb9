use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex as StdMutex,
};

use super::*;
use async_trait::async_trait;
use client_core::{NoopObserver, SentimentClient};
use shared::{
    domain::{HealthState, Sentiment},
    protocol::{ModelInfo, ModelPrediction, RetrainStatus},
};
use tokio::net::TcpListener;

struct StubTransport {
    outcome: Result<PredictionResult, ClientError>,
    health: HealthStatus,
    predict_calls: AtomicUsize,
    last_input: StdMutex<Option<ReviewInput>>,
}

impl StubTransport {
    fn answering(outcome: Result<PredictionResult, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            health: HealthStatus {
                status: HealthState::Healthy,
                message: None,
            },
            predict_calls: AtomicUsize::new(0),
            last_input: StdMutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentTransport for StubTransport {
    async fn check_health(&self) -> HealthStatus {
        self.health.clone()
    }

    async fn predict_sentiment(
        &self,
        input: &ReviewInput,
    ) -> Result<PredictionResult, ClientError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().expect("input lock") = Some(input.clone());
        self.outcome.clone()
    }

    async fn get_model_info(&self) -> Result<ModelInfo, ClientError> {
        Err(ClientError::ModelInfo("not stubbed".into()))
    }

    async fn retrain_models(&self) -> Result<RetrainStatus, ClientError> {
        Err(ClientError::Retrain("not stubbed".into()))
    }
}

fn split_result() -> PredictionResult {
    PredictionResult {
        overall_prediction: Sentiment::Positive,
        predictions: vec![
            ModelPrediction {
                model_name: "A".into(),
                prediction: Sentiment::Positive,
                confidence: 0.9,
            },
            ModelPrediction {
                model_name: "B".into(),
                prediction: Sentiment::Negative,
                confidence: 0.4,
            },
        ],
        input_data: ReviewInput::new("Sharp writing and a great cast."),
    }
}

#[tokio::test]
async fn short_review_is_rejected_without_network_call() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport.clone());
    session.set_field(FormField::ReviewText, "   too short   ");

    let err = session.submit().await.expect_err("must be rejected");

    assert!(matches!(err, FormError::Invalid(ref errors) if errors.len() == 1));
    assert_eq!(session.state(), &UiState::Idle);
    assert_eq!(session.controller().field_errors()[0].field, FormField::ReviewText);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn out_of_range_audience_score_is_rejected_without_network_call() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport.clone());
    session.load_preset(Preset::Positive).expect("preset");
    session.set_field(FormField::AudienceScore, "101");

    let err = session.submit().await.expect_err("must be rejected");

    assert_eq!(
        err,
        FormError::Invalid(vec![FieldError {
            field: FormField::AudienceScore,
            message: "Audience score must be between 0 and 100".into(),
        }])
    );
    assert_eq!(session.state(), &UiState::Idle);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn editing_a_field_clears_its_error() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport);
    let _ = session.submit().await;
    assert_eq!(session.controller().field_errors().len(), 1);

    session.set_field(FormField::ReviewText, "Now it is long enough.");
    assert!(session.controller().field_errors().is_empty());
}

#[tokio::test]
async fn successful_submit_then_new_analysis_returns_to_defaults() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport.clone());
    session.load_preset(Preset::Positive).expect("preset");

    session.submit().await.expect("submit");

    assert_eq!(session.state(), &UiState::Result(split_result()));
    assert_eq!(transport.calls(), 1);
    let sent = transport
        .last_input
        .lock()
        .expect("input lock")
        .clone()
        .expect("input sent");
    assert_eq!(sent.title.as_deref(), Some("The Matrix"));
    assert_eq!(sent.audience_score, Some(87.0));

    session.new_analysis().expect("reset");

    assert_eq!(session.state(), &UiState::Idle);
    assert_eq!(session.controller().form(), &ReviewForm::default());
    assert!(session.controller().form().review_text.is_empty());
}

#[tokio::test]
async fn transport_failure_is_stored_as_error_message() {
    let transport = StubTransport::answering(Err(ClientError::Validation(
        "body.reviewText: too short".into(),
    )));
    let mut session = Session::new(transport);
    session.load_preset(Preset::Negative).expect("preset");

    session.submit().await.expect("submit");

    assert_eq!(
        session.state(),
        &UiState::Error("Validation Error: body.reviewText: too short".into())
    );
}

#[tokio::test]
async fn connection_refused_yields_network_error_state() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = SentimentClient::new(format!("http://{addr}"), Arc::new(NoopObserver))
        .expect("client");
    let mut session = Session::new(Arc::new(client));
    session.load_preset(Preset::Positive).expect("preset");

    session.submit().await.expect("submit");

    assert_eq!(
        session.state(),
        &UiState::Error("Network Error: Cannot connect to the server".into())
    );
    assert!(!matches!(session.state(), UiState::Result(_)));
}

#[tokio::test]
async fn submit_is_disabled_while_loading() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport.clone());
    session.load_preset(Preset::Positive).expect("preset");

    let input = session.begin_submit().expect("first submit");
    assert!(session.state().is_loading());
    assert!(!session.can_submit());

    assert_eq!(session.begin_submit(), Err(FormError::Busy));
    assert_eq!(session.load_preset(Preset::Negative), Err(FormError::Busy));
    assert_eq!(session.clear_form(), Err(FormError::Busy));
    assert_eq!(session.new_analysis(), Err(FormError::Busy));

    session.set_field(FormField::Title, "Still editable");
    assert_eq!(session.controller().form().title, "Still editable");

    let outcome = transport.predict_sentiment(&input).await;
    session.finish_submit(outcome);
    assert!(matches!(session.state(), UiState::Result(_)));
    assert!(session.can_submit());
}

#[tokio::test]
async fn resubmitting_from_error_replaces_the_error() {
    let failing = StubTransport::answering(Err(ClientError::Timeout));
    let mut session = Session::new(failing);
    session.load_preset(Preset::Positive).expect("preset");
    session.submit().await.expect("submit");
    assert!(matches!(session.state(), UiState::Error(_)));

    let input = session.begin_submit().expect("retry allowed");
    assert_eq!(session.state(), &UiState::Loading);
    session.finish_submit(Ok(PredictionResult {
        input_data: input,
        ..split_result()
    }));
    assert!(matches!(session.state(), UiState::Result(_)));
}

#[tokio::test]
async fn stale_outcome_without_pending_submit_is_ignored() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport);

    session.finish_submit(Ok(split_result()));

    assert_eq!(session.state(), &UiState::Idle);
}

#[tokio::test]
async fn clear_form_keeps_the_current_result() {
    let transport = StubTransport::answering(Ok(split_result()));
    let mut session = Session::new(transport);
    session.load_preset(Preset::Positive).expect("preset");
    session.submit().await.expect("submit");

    session.clear_form().expect("clear");

    assert_eq!(session.controller().form(), &ReviewForm::default());
    assert!(matches!(session.state(), UiState::Result(_)));
}

#[tokio::test]
async fn health_refresh_is_advisory_only() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = SentimentClient::new(format!("http://{addr}"), Arc::new(NoopObserver))
        .expect("client");
    let mut session = Session::new(Arc::new(client));

    let health = session.refresh_health().await.clone();

    assert_eq!(health.status, HealthState::Unhealthy);
    assert_eq!(session.state(), &UiState::Idle);
    assert!(session.can_submit());
    assert!(session.health().is_some());
}
