pub mod types;
pub mod modality;
pub mod questionnaire;
pub mod sanitize;
pub mod prompt;
pub mod consistency;
pub mod gateway;
pub mod openai;
pub mod parser;
pub mod orchestrator;

pub use types::*;
pub use modality::*;
pub use questionnaire::*;
pub use sanitize::*;
pub use prompt::*;
pub use consistency::*;
pub use gateway::*;
pub use openai::*;
pub use parser::*;
pub use orchestrator::*;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Model gateway is not configured: {0}")]
    NotConfigured(String),

    #[error("Model gateway is unreachable at {0}")]
    Unreachable(String),

    #[error("Model gateway timed out after {0}s")]
    Timeout(u64),

    #[error("Model gateway returned error (status {status}): {body}")]
    GatewayStatus { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

/// The two failure classes a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Nothing usable was produced because the backend is missing,
    /// unreachable or timed out. Needs an operator, not a resubmit.
    Configuration,
    /// The model answered, but not with the expected structure.
    /// Resubmitting the same request may succeed.
    MalformedResponse,
}

impl SynthesisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::NotConfigured(_)
            | Self::Unreachable(_)
            | Self::Timeout(_)
            | Self::GatewayStatus { .. } => FailureKind::Configuration,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == FailureKind::Configuration
    }

    pub fn is_resubmittable(&self) -> bool {
        self.kind() == FailureKind::MalformedResponse
    }
}
