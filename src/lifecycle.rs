//! Report lifecycle: NoDraft → Draft → Finalized.
//!
//! Drafting may repeat any number of times and each draft fully replaces the
//! previous one. Finalization requires the radiologist's sign-off text and is
//! terminal. Every transition either succeeds completely or leaves the report
//! untouched, so a synthesis call that fails or is abandoned never changes
//! lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ReportState, StudyStatus};
use crate::pipeline::synthesis::{ConsistencyWarning, DraftResult};

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Report has no draft to finalize")]
    NotDrafted,
    #[error("Report is already finalized")]
    AlreadyFinalized,
    #[error("Sign-off is missing required field: {0}")]
    MissingSignOff(&'static str),
}

// ═══════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════

/// Text the radiologist confirms at finalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignOff {
    pub findings: String,
    pub impression: String,
    /// Falls back to the drafted technique when absent.
    #[serde(default)]
    pub technique: Option<String>,
}

impl SignOff {
    pub fn new(findings: &str, impression: &str) -> Self {
        Self {
            findings: findings.to_string(),
            impression: impression.to_string(),
            technique: None,
        }
    }

    pub fn with_technique(mut self, technique: &str) -> Self {
        self.technique = Some(technique.to_string());
        self
    }
}

/// Immutable snapshot handed to the document renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedReport {
    pub technique: String,
    pub findings: String,
    pub impression: String,
    pub internal_checks: Vec<ConsistencyWarning>,
    pub finalized_at: DateTime<Utc>,
    pub study_status: StudyStatus,
}

/// The persisted report for one study.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub state: ReportState,
    pub technique: String,
    pub findings: String,
    pub impression: String,
    pub internal_checks: Vec<ConsistencyWarning>,
    pub raw_model_response: Option<serde_json::Value>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a draft, replacing any previous one.
    pub fn apply_draft(&mut self, draft: DraftResult) -> Result<(), LifecycleError> {
        if self.state == ReportState::Finalized {
            return Err(LifecycleError::AlreadyFinalized);
        }

        let redraft = self.state == ReportState::Draft;
        self.state = ReportState::Draft;
        self.technique = draft.technique;
        self.findings = draft.findings;
        self.impression = draft.impression;
        self.internal_checks = draft.internal_checks;
        self.raw_model_response = Some(draft.raw_model_response);
        self.finalized_at = None;

        tracing::info!(
            redraft,
            internal_checks = self.internal_checks.len(),
            "Report draft applied"
        );
        Ok(())
    }

    /// Finalize with the current time.
    pub fn finalize(&mut self, sign_off: SignOff) -> Result<FinalizedReport, LifecycleError> {
        self.finalize_at(sign_off, Utc::now())
    }

    /// Finalize with an explicit timestamp.
    pub fn finalize_at(
        &mut self,
        sign_off: SignOff,
        at: DateTime<Utc>,
    ) -> Result<FinalizedReport, LifecycleError> {
        match self.state {
            ReportState::NoDraft => return Err(LifecycleError::NotDrafted),
            ReportState::Finalized => return Err(LifecycleError::AlreadyFinalized),
            ReportState::Draft => {}
        }
        if sign_off.findings.trim().is_empty() {
            return Err(LifecycleError::MissingSignOff("findings"));
        }
        if sign_off.impression.trim().is_empty() {
            return Err(LifecycleError::MissingSignOff("impression"));
        }

        if let Some(technique) = sign_off.technique.filter(|t| !t.trim().is_empty()) {
            self.technique = technique;
        }
        self.findings = sign_off.findings;
        self.impression = sign_off.impression;
        self.finalized_at = Some(at);
        self.state = ReportState::Finalized;

        tracing::info!(finalized_at = %at, "Report finalized");

        Ok(FinalizedReport {
            technique: self.technique.clone(),
            findings: self.findings.clone(),
            impression: self.impression.clone(),
            internal_checks: self.internal_checks.clone(),
            finalized_at: at,
            study_status: StudyStatus::Finalized,
        })
    }

    /// Whether a document may be rendered from this report.
    pub fn is_renderable(&self) -> bool {
        self.state == ReportState::Finalized
    }

    pub fn study_status(&self) -> StudyStatus {
        match self.state {
            ReportState::Finalized => StudyStatus::Finalized,
            ReportState::NoDraft | ReportState::Draft => StudyStatus::Draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn draft(findings: &str) -> DraftResult {
        DraftResult {
            technique: "Standard abdominal ultrasound.".into(),
            findings: findings.into(),
            impression: "Normal study.".into(),
            internal_checks: vec![ConsistencyWarning::sentinel()],
            raw_model_response: json!({"id": findings}),
            unanswered_required: Vec::new(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn drafted() -> Report {
        let mut report = Report::new();
        report.apply_draft(draft("Liver normal.")).unwrap();
        report
    }

    #[test]
    fn new_report_has_no_draft() {
        let report = Report::new();
        assert_eq!(report.state, ReportState::NoDraft);
        assert!(!report.is_renderable());
        assert_eq!(report.study_status(), StudyStatus::Draft);
    }

    #[test]
    fn finalize_without_draft_is_rejected_unchanged() {
        let mut report = Report::new();
        let before = report.clone();
        let err = report.finalize_at(SignOff::new("F", "I"), at()).unwrap_err();
        assert_eq!(err, LifecycleError::NotDrafted);
        assert_eq!(report, before);
    }

    #[test]
    fn second_draft_fully_replaces_first() {
        let mut report = drafted();
        let mut second = draft("Spleen enlarged.");
        second.internal_checks = vec![ConsistencyWarning::new("Gallbladder marked absent but stones flagged present.")];
        second.technique = String::new();
        report.apply_draft(second).unwrap();

        assert_eq!(report.state, ReportState::Draft);
        assert_eq!(report.findings, "Spleen enlarged.");
        assert_eq!(report.technique, "");
        assert_eq!(report.internal_checks.len(), 1);
        assert!(!report.internal_checks[0].is_sentinel());
        assert_eq!(report.raw_model_response, Some(json!({"id": "Spleen enlarged."})));
    }

    #[test]
    fn finalize_records_sign_off_and_timestamp() {
        let mut report = drafted();
        let finalized = report
            .finalize_at(SignOff::new("Edited findings.", "Edited impression."), at())
            .unwrap();

        assert_eq!(report.state, ReportState::Finalized);
        assert_eq!(report.finalized_at, Some(at()));
        assert!(report.is_renderable());
        assert_eq!(report.study_status(), StudyStatus::Finalized);

        assert_eq!(finalized.findings, "Edited findings.");
        assert_eq!(finalized.impression, "Edited impression.");
        assert_eq!(finalized.technique, "Standard abdominal ultrasound.");
        assert_eq!(finalized.finalized_at, at());
        assert_eq!(finalized.study_status, StudyStatus::Finalized);
    }

    #[test]
    fn supplied_technique_overrides_draft() {
        let mut report = drafted();
        let finalized = report
            .finalize_at(SignOff::new("F", "I").with_technique("Limited exam."), at())
            .unwrap();
        assert_eq!(finalized.technique, "Limited exam.");
    }

    #[test]
    fn blank_technique_keeps_draft_text() {
        let mut report = drafted();
        let finalized = report
            .finalize_at(SignOff::new("F", "I").with_technique("  "), at())
            .unwrap();
        assert_eq!(finalized.technique, "Standard abdominal ultrasound.");
    }

    #[test]
    fn blank_sign_off_fields_are_rejected_unchanged() {
        let mut report = drafted();
        let before = report.clone();

        let err = report.finalize_at(SignOff::new("  ", "I"), at()).unwrap_err();
        assert_eq!(err, LifecycleError::MissingSignOff("findings"));
        let err = report.finalize_at(SignOff::new("F", ""), at()).unwrap_err();
        assert_eq!(err, LifecycleError::MissingSignOff("impression"));

        assert_eq!(report, before);
    }

    #[test]
    fn finalized_report_is_terminal() {
        let mut report = drafted();
        report.finalize_at(SignOff::new("F", "I"), at()).unwrap();
        let before = report.clone();

        assert_eq!(
            report.finalize_at(SignOff::new("F2", "I2"), at()).unwrap_err(),
            LifecycleError::AlreadyFinalized
        );
        assert_eq!(
            report.apply_draft(draft("Late draft.")).unwrap_err(),
            LifecycleError::AlreadyFinalized
        );
        assert_eq!(report, before);
    }

    #[test]
    fn failed_synthesis_leaves_report_untouched() {
        use crate::models::{Modality, PatientContext, StructuredAnswers, StudyContext};
        use crate::pipeline::synthesis::{MockGateway, ReportSynthesizer};

        let mut report = drafted();
        let before = report.clone();
        let synthesizer = ReportSynthesizer::new(Box::new(MockGateway::new("not json")));

        let outcome = synthesizer.synthesize(
            &StudyContext::new(Modality::AbdominalUltrasound),
            &PatientContext::new("John Doe"),
            &StructuredAnswers::new().with("liver_size", "Normal"),
        );
        let err = outcome.as_ref().unwrap_err();
        assert!(err.is_resubmittable());
        if let Ok(result) = outcome {
            report.apply_draft(result).unwrap();
        }
        assert_eq!(report, before);
        assert_eq!(report.findings, "Liver normal.");
    }

    #[test]
    fn finalize_uses_current_time() {
        let mut report = drafted();
        let before = Utc::now();
        let finalized = report.finalize(SignOff::new("F", "I")).unwrap();
        assert!(finalized.finalized_at >= before);
    }

    #[test]
    fn report_round_trips_through_json() {
        let mut report = drafted();
        report.finalize_at(SignOff::new("F", "I"), at()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"state\":\"finalized\""));
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
