use std::{io::Write as _, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{SentimentClient, SentimentTransport, TracingObserver};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::oneshot,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod interactive;
mod ui;

use controller::{
    form::{FormField, Preset},
    session::{FormError, Session, UiState},
};
use interactive::{Interactive, HELP};
use ui::{
    presenter::{HealthIndicator, Panel},
    render,
};

#[derive(Parser, Debug)]
#[command(about = "Movie review sentiment prediction client")]
struct Cli {
    /// Base URL of the prediction service.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the prediction service is reachable.
    Health,
    /// Print metadata about the loaded models.
    Models,
    /// Ask the service to retrain its models.
    Retrain,
    /// Submit a single review and print the prediction.
    Predict(PredictArgs),
    /// Edit and submit reviews in a line-oriented session.
    Interactive,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Start from a canned review: positive or negative.
    #[arg(long)]
    sample: Option<Preset>,
    #[arg(long)]
    review_text: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    rating: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    reviewer_name: Option<String>,
    #[arg(long)]
    original_language: Option<String>,
    #[arg(long)]
    distributor: Option<String>,
    #[arg(long)]
    director: Option<String>,
    #[arg(long)]
    audience_score: Option<String>,
}

impl PredictArgs {
    fn apply(&self, session: &mut Session) -> Result<()> {
        if let Some(preset) = self.sample {
            session.load_preset(preset)?;
        }
        let overrides = [
            (FormField::ReviewText, &self.review_text),
            (FormField::Title, &self.title),
            (FormField::Rating, &self.rating),
            (FormField::Genre, &self.genre),
            (FormField::ReviewerName, &self.reviewer_name),
            (FormField::OriginalLanguage, &self.original_language),
            (FormField::Distributor, &self.distributor),
            (FormField::Director, &self.director),
            (FormField::AudienceScore, &self.audience_score),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                session.set_field(field, value.clone());
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load_settings(cli.api_url.as_deref())?;
    init_tracing(&settings.log_filter);
    info!(api_url = %settings.api_url, "review_cli: starting");

    let client = SentimentClient::new(settings.api_url.clone(), Arc::new(TracingObserver))
        .context("failed to create prediction client")?;
    let transport: Arc<dyn SentimentTransport> = Arc::new(client);

    match cli.command {
        Command::Health => {
            let health = transport.check_health().await;
            println!(
                "{}",
                render::render_health(&HealthIndicator::from_status(&health))
            );
        }
        Command::Models => {
            let info = transport.get_model_info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Retrain => {
            let status = transport.retrain_models().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Predict(args) => run_predict(transport, &args).await?,
        Command::Interactive => run_interactive(transport).await?,
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_predict(transport: Arc<dyn SentimentTransport>, args: &PredictArgs) -> Result<()> {
    let mut session = Session::new(transport);
    args.apply(&mut session)?;

    if let Err(err) = session.submit().await {
        if let FormError::Invalid(errors) = &err {
            eprint!("{}", render::render_field_errors(errors));
        }
        bail!(err);
    }

    if let UiState::Error(message) = session.state() {
        bail!("{message}");
    }
    print!("{}", render::render_panel(&Panel::from_state(session.state())));
    Ok(())
}

async fn run_interactive(transport: Arc<dyn SentimentTransport>) -> Result<()> {
    let mut repl = Interactive::new(Arc::clone(&transport));

    let (health_tx, mut health_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = health_tx.send(transport.check_health().await);
    });
    let mut health_pending = true;

    print!("{HELP}");
    prompt(&repl)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            health = &mut health_rx, if health_pending => {
                health_pending = false;
                if let Ok(health) = health {
                    println!("\n{}", repl.apply_health(health));
                    prompt(&repl)?;
                }
            }
            Some(outcome) = repl.next_outcome() => {
                print!("\n{}", repl.apply_outcome(outcome));
                prompt(&repl)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match repl.handle_line(&line).await {
                    Ok(reply) => {
                        print!("{}", reply.output);
                        if reply.quit {
                            break;
                        }
                    }
                    Err(err) => println!("! {err}"),
                }
                prompt(&repl)?;
            }
        }
    }
    Ok(())
}

fn prompt(repl: &Interactive) -> Result<()> {
    print!("{}", repl.prompt());
    std::io::stdout().flush().context("failed to flush stdout")
}
