pub mod config;
pub mod lifecycle;
pub mod models;
pub mod pipeline;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use models::{PatientContext, StructuredAnswers, StudyContext};
use pipeline::synthesis::{DraftResult, ReportSynthesizer, SynthesisError};

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// One drafting request as supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub study: StudyContext,
    pub patient: PatientContext,
    #[serde(default)]
    pub answers: StructuredAnswers,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Invalid draft request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl RunError {
    /// Process exit code: 1 bad input, 2 configuration, 3 malformed model output.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) => 1,
            Self::Synthesis(e) if e.is_configuration() => 2,
            Self::Synthesis(_) => 3,
        }
    }
}

/// Decode a JSON request and draft it.
pub fn draft_from_json(
    synthesizer: &ReportSynthesizer,
    input: &str,
) -> Result<DraftResult, RunError> {
    let request: DraftRequest = serde_json::from_str(input)?;
    let result = synthesizer.synthesize(&request.study, &request.patient, &request.answers)?;
    Ok(result)
}
