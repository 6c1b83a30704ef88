use std::collections::HashSet;

use crate::models::{PatientContext, StructuredAnswers, StudyContext};

use super::consistency::ConsistencyChecker;
use super::parser::parse_draft_response;
use super::prompt::{build_system_directive, build_user_payload};
use super::questionnaire::unanswered_required;
use super::types::{ConsistencyWarning, DraftResult, GatewayRequest, ModelGateway};
use super::SynthesisError;

/// Drafts report text from structured answers through a model gateway.
///
/// Stateless between calls. Shareable across threads when the gateway is.
pub struct ReportSynthesizer {
    gateway: Box<dyn ModelGateway + Send + Sync>,
    checker: ConsistencyChecker,
}

impl ReportSynthesizer {
    pub fn new(gateway: Box<dyn ModelGateway + Send + Sync>) -> Self {
        Self {
            gateway,
            checker: ConsistencyChecker::default(),
        }
    }

    pub fn with_checker(mut self, checker: ConsistencyChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Produce one draft. Single attempt; gateway errors propagate unchanged.
    pub fn synthesize(
        &self,
        study: &StudyContext,
        patient: &PatientContext,
        answers: &StructuredAnswers,
    ) -> Result<DraftResult, SynthesisError> {
        let _span = tracing::info_span!(
            "synthesize",
            modality = %study.modality,
            answer_count = answers.len()
        )
        .entered();

        let request = GatewayRequest::structured(
            build_system_directive(study),
            build_user_payload(study, patient, answers),
        );

        let response = self.gateway.invoke(&request).map_err(|e| {
            tracing::warn!(kind = ?e.kind(), "Model gateway call failed");
            e
        })?;

        let parsed = parse_draft_response(&response.content).map_err(|e| {
            tracing::warn!(
                content_chars = response.content.chars().count(),
                "Model response could not be parsed"
            );
            e
        })?;

        let rule_warnings = self.checker.check(answers, patient);
        let model_check_count = parsed.internal_checks.len();
        let rule_warning_count = rule_warnings.len();
        let internal_checks = merge_internal_checks(parsed.internal_checks, rule_warnings);

        let unanswered: Vec<String> = unanswered_required(&study.modality, answers)
            .into_iter()
            .map(str::to_string)
            .collect();

        tracing::info!(
            model_checks = model_check_count,
            rule_warnings = rule_warning_count,
            internal_checks = internal_checks.len(),
            unanswered_required = unanswered.len(),
            "Draft synthesized"
        );

        Ok(DraftResult {
            technique: parsed.technique,
            findings: parsed.findings,
            impression: parsed.impression,
            internal_checks,
            raw_model_response: response.raw_audit_record,
            unanswered_required: unanswered,
        })
    }
}

/// Model warnings first, then rule warnings. Exact duplicates collapse to
/// their first occurrence; an empty result becomes the sentinel alone.
pub fn merge_internal_checks<I>(model: I, rules: Vec<ConsistencyWarning>) -> Vec<ConsistencyWarning>
where
    I: IntoIterator,
    I::Item: Into<ConsistencyWarning>,
{
    let mut seen: HashSet<ConsistencyWarning> = HashSet::new();
    let mut merged = Vec::new();

    for warning in model.into_iter().map(Into::into).chain(rules) {
        if seen.insert(warning.clone()) {
            merged.push(warning);
        }
    }

    if merged.is_empty() {
        merged.push(ConsistencyWarning::sentinel());
    }
    merged
}
