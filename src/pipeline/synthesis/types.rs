use serde::{Deserialize, Serialize};

use super::SynthesisError;

/// Canonical entry used when neither the model nor the rule battery
/// reported an inconsistency.
pub const NO_INCONSISTENCIES: &str = "No inconsistencies detected.";

/// A single human-readable description of a contradiction in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsistencyWarning(String);

impl ConsistencyWarning {
    pub fn new(text: &str) -> Self {
        Self(text.to_string())
    }

    /// The "no inconsistencies detected" entry.
    pub fn sentinel() -> Self {
        Self::new(NO_INCONSISTENCIES)
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == NO_INCONSISTENCIES
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConsistencyWarning {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canonical output of one drafting call.
///
/// `internal_checks` is never empty: it holds at least the sentinel entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftResult {
    pub technique: String,
    pub findings: String,
    pub impression: String,
    pub internal_checks: Vec<ConsistencyWarning>,
    /// Gateway audit record, attached unmodified.
    pub raw_model_response: serde_json::Value,
    /// Keys of required intake questions that were left unanswered.
    #[serde(default)]
    pub unanswered_required: Vec<String>,
}

impl DraftResult {
    /// True when only the sentinel entry is present.
    pub fn is_consistent(&self) -> bool {
        self.internal_checks.iter().all(ConsistencyWarning::is_sentinel)
    }
}

/// Output format the gateway must request from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[serde(rename = "structured-json")]
    StructuredJson,
}

/// A rendered instruction pair ready to be sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub system_directive: String,
    pub user_payload: String,
    pub response_format: ResponseFormat,
}

impl GatewayRequest {
    pub fn structured(system_directive: String, user_payload: String) -> Self {
        Self {
            system_directive,
            user_payload,
            response_format: ResponseFormat::StructuredJson,
        }
    }
}

/// What the gateway returned: the model's content text plus an opaque
/// record kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub content: String,
    pub raw_audit_record: serde_json::Value,
}

/// Generative model backend abstraction (allows mocking).
pub trait ModelGateway {
    fn invoke(&self, request: &GatewayRequest) -> Result<GatewayResponse, SynthesisError>;
}
