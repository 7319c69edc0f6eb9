//! Line-oriented single-page session. Predictions run on a background task so
//! input keeps being read while one is pending.

use std::sync::Arc;

use anyhow::{bail, Result};
use client_core::{ClientError, SentimentTransport};
use shared::protocol::{HealthStatus, PredictionResult};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    controller::{
        form::{FormField, Preset},
        session::{FormError, Session},
    },
    ui::{
        presenter::{HealthIndicator, Panel},
        render,
    },
};

pub const HELP: &str = "\
commands:
  set <field> <value>      edit a field (reviewText, title, rating, genre, reviewerName,
                           originalLanguage, distributor, director, audienceScore)
  sample positive|negative load a canned review
  clear                    reset all fields
  submit                   send the review for prediction
  new                      start a new analysis
  show                     print the form, the api status and the current result
  health                   re-check the service
  models                   print model info
  quit                     leave
";

type Outcome = Result<PredictionResult, ClientError>;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

pub struct Interactive {
    session: Session,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl Interactive {
    pub fn new(transport: Arc<dyn SentimentTransport>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(transport),
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn apply_health(&mut self, health: HealthStatus) -> String {
        let health = self.session.set_health(health);
        render::render_health(&HealthIndicator::from_status(health))
    }

    pub fn prompt(&self) -> &'static str {
        if self.session.can_submit() {
            "> "
        } else {
            "(analyzing) > "
        }
    }

    /// Resolves when the pending prediction finishes. Never resolves while
    /// nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        self.outcome_rx.recv().await
    }

    pub fn apply_outcome(&mut self, outcome: Outcome) -> String {
        self.session.finish_submit(outcome);
        render::render_panel(&Panel::from_state(self.session.state()))
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Reply> {
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let command = parts.next().unwrap_or_default();

        let output = match command {
            "" => String::new(),
            "help" => HELP.to_string(),
            "quit" | "exit" => {
                return Ok(Reply {
                    output: String::new(),
                    quit: true,
                })
            }
            "set" => {
                let field: FormField = parts
                    .next()
                    .unwrap_or_default()
                    .parse()
                    .map_err(anyhow::Error::msg)?;
                self.session
                    .set_field(field, parts.next().unwrap_or_default().trim());
                String::new()
            }
            "sample" => {
                let preset: Preset = parts
                    .next()
                    .unwrap_or_default()
                    .parse()
                    .map_err(anyhow::Error::msg)?;
                self.session.load_preset(preset)?;
                self.render_form()
            }
            "clear" => {
                self.session.clear_form()?;
                self.render_form()
            }
            "submit" => self.submit()?,
            "new" => {
                self.session.new_analysis()?;
                render::render_panel(&Panel::from_state(self.session.state()))
            }
            "show" => {
                let mut output = self.render_form();
                if let Some(health) = self.session.health() {
                    output.push_str(&render::render_health(&HealthIndicator::from_status(
                        health,
                    )));
                    output.push('\n');
                }
                output.push_str(&render::render_panel(&Panel::from_state(
                    self.session.state(),
                )));
                output
            }
            "health" => {
                let health = self.session.refresh_health().await;
                format!(
                    "{}\n",
                    render::render_health(&HealthIndicator::from_status(health))
                )
            }
            "models" => {
                let info = self
                    .session
                    .controller()
                    .transport()
                    .get_model_info()
                    .await?;
                format!("{}\n", serde_json::to_string_pretty(&info)?)
            }
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Reply::text(output))
    }

    fn submit(&mut self) -> Result<String> {
        let input = match self.session.begin_submit() {
            Ok(input) => input,
            Err(FormError::Invalid(errors)) => return Ok(render::render_field_errors(&errors)),
            Err(err) => return Err(err.into()),
        };

        let transport = self.session.controller().transport();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.predict_sentiment(&input).await;
            if outcome_tx.send(outcome).is_err() {
                debug!("interactive: session closed before prediction finished");
            }
        });
        Ok(render::render_panel(&Panel::Loading))
    }

    fn render_form(&self) -> String {
        let controller = self.session.controller();
        render::render_form(controller.form(), controller.field_errors())
    }
}

#[cfg(test)]
#[path = "tests/interactive_tests.rs"]
mod tests;
