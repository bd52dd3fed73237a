use std::sync::Arc;

use clap::Parser;
use decision_audit::adapters::{SseSourceConfig, SseStreamSource};
use decision_audit::application::{
    DecisionSession, DecisionStreamReducer, SubmitOutcome, SubmitRejection,
};
use decision_audit::config::{AppConfig, ConfigError, ValidationError};
use decision_audit::domain::decision::{ContextField, DecisionAuditState, DecisionContext};
use decision_audit::ports::StreamSourceError;
use decision_audit::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "decision-audit",
    about = "Evaluate one decision against the audit backend and print the final snapshot",
    version
)]
struct Cli {
    /// The decision to evaluate
    decision: String,

    /// A constraint to respect (repeatable)
    #[arg(short, long = "constraint")]
    constraints: Vec<String>,

    /// Growth priority, 1-5
    #[arg(long)]
    growth: Option<i32>,

    /// Stability priority, 1-5
    #[arg(long)]
    stability: Option<i32>,

    /// Flexibility priority, 1-5
    #[arg(long)]
    flexibility: Option<i32>,

    /// Learning priority, 1-5
    #[arg(long)]
    learning: Option<i32>,

    /// Risk tolerance, 1-5
    #[arg(long)]
    risk_tolerance: Option<i32>,

    /// Emotional stress, 1-5
    #[arg(long)]
    stress: Option<i32>,
}

impl Cli {
    fn context(&self) -> DecisionContext {
        [
            (ContextField::GrowthPriority, self.growth),
            (ContextField::StabilityPriority, self.stability),
            (ContextField::FlexibilityPriority, self.flexibility),
            (ContextField::LearningPriority, self.learning),
            (ContextField::RiskTolerance, self.risk_tolerance),
            (ContextField::EmotionalStress, self.stress),
        ]
        .into_iter()
        .fold(DecisionContext::default(), |context, (field, value)| {
            match value {
                Some(value) => context.with_field(field, value),
                None => context,
            }
        })
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("stream source unavailable: {0}")]
    Source(#[from] StreamSourceError),

    #[error("submit rejected: {0:?}")]
    Rejected(SubmitRejection),

    #[error("session closed before the evaluation finished")]
    SessionClosed,

    #[error("failed to render snapshot: {0}")]
    Render(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("decision-audit error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.logging)?;

    let source = SseStreamSource::new(SseSourceConfig::from_stream_config(&config.stream))?;
    let reducer =
        DecisionStreamReducer::new(config.scoring.confidence_inputs()).with_context(cli.context());
    let session = DecisionSession::from_reducer(Arc::new(source), reducer);

    let mut updates = session.subscribe();
    match session.submit(&cli.decision, cli.constraints.clone()) {
        SubmitOutcome::Started(id) => info!(subscription_id = %id, "Evaluation submitted"),
        SubmitOutcome::Rejected(rejection) => return Err(CliError::Rejected(rejection)),
    }

    let finished = wait_for_finish(&session, &mut updates).await?;
    println!("{}", serde_json::to_string_pretty(finished.as_ref())?);
    Ok(())
}

async fn wait_for_finish(
    session: &DecisionSession,
    updates: &mut tokio::sync::watch::Receiver<Arc<DecisionAuditState>>,
) -> Result<Arc<DecisionAuditState>, CliError> {
    let mut last_status: Option<String> = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed.map_err(|_| CliError::SessionClosed)?;
                let state = Arc::clone(&updates.borrow_and_update());
                if state.status_message.is_some() && state.status_message != last_status {
                    last_status = state.status_message.clone();
                    info!(status = ?last_status, options = state.options.len(), "Progress");
                }
                if !state.phase.is_streaming() {
                    return Ok(state);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling evaluation");
                session.cancel();
                return Ok(session.snapshot());
            }
        }
    }
}
