//! Rule-based consistency checks over the raw structured answers.
//!
//! Rules never see model output. Each rule inspects the full answer set once
//! and yields at most one warning.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{PatientContext, StructuredAnswers};

use super::types::ConsistencyWarning;

pub const GALLBLADDER_STATUS_KEY: &str = "gallbladder_status";
pub const GALLSTONES_KEY: &str = "gallstones";
pub const APPENDIX_VISUALIZED_KEY: &str = "appendix_visualized";
pub const IMPRESSION_HINT_KEY: &str = "impression_hint";

/// Ovarian, uterine and endometrial terms in answer keys.
static GYNECOLOGIC_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ovar(?:y|ies|ian)|uter(?:us|ine)|endometri").unwrap()
});

const GALLBLADDER_ABSENT: &[&str] = &["absent", "surgically absent"];
const STONES_NEGATIVE: &[&str] = &["no", "absent", "none"];
const APPENDIX_NOT_SEEN: &[&str] = &["not visualized", "not seen"];

/// A single independent consistency rule.
pub trait ConsistencyRule {
    /// Stable rule identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Evaluate the rule once over the full answer set.
    fn evaluate(
        &self,
        answers: &StructuredAnswers,
        patient: &PatientContext,
    ) -> Option<ConsistencyWarning>;
}

/// Male patient with gynecologic answers.
pub struct SexAnatomyRule;

impl ConsistencyRule for SexAnatomyRule {
    fn name(&self) -> &'static str {
        "sex_anatomy"
    }

    fn evaluate(
        &self,
        answers: &StructuredAnswers,
        patient: &PatientContext,
    ) -> Option<ConsistencyWarning> {
        if patient.normalized_sex() != "male" {
            return None;
        }
        answers
            .keys()
            .any(|key| GYNECOLOGIC_KEY.is_match(key))
            .then(|| ConsistencyWarning::new("Patient sex is male but gynecologic findings provided."))
    }
}

/// Gallbladder recorded absent while gallstones are recorded present.
pub struct GallbladderStonesRule;

impl ConsistencyRule for GallbladderStonesRule {
    fn name(&self) -> &'static str {
        "gallbladder_stones"
    }

    fn evaluate(
        &self,
        answers: &StructuredAnswers,
        _patient: &PatientContext,
    ) -> Option<ConsistencyWarning> {
        let status = answers.normalized(GALLBLADDER_STATUS_KEY)?;
        if !GALLBLADDER_ABSENT.contains(&status.as_str()) {
            return None;
        }
        let stones = answers.normalized(GALLSTONES_KEY)?;
        (!STONES_NEGATIVE.contains(&stones.as_str()))
            .then(|| ConsistencyWarning::new("Gallbladder marked absent but stones flagged present."))
    }
}

/// Appendix not visualized while the impression hint names appendicitis.
pub struct AppendixImpressionRule;

impl ConsistencyRule for AppendixImpressionRule {
    fn name(&self) -> &'static str {
        "appendix_impression"
    }

    fn evaluate(
        &self,
        answers: &StructuredAnswers,
        _patient: &PatientContext,
    ) -> Option<ConsistencyWarning> {
        let visibility = answers.normalized(APPENDIX_VISUALIZED_KEY)?;
        if !APPENDIX_NOT_SEEN.contains(&visibility.as_str()) {
            return None;
        }
        let impression = answers.normalized(IMPRESSION_HINT_KEY)?;
        impression.contains("appendicitis").then(|| {
            ConsistencyWarning::new("Appendix not visualized but impression suggests appendicitis.")
        })
    }
}

/// Runs a fixed, ordered battery of rules.
pub struct ConsistencyChecker {
    rules: Vec<Box<dyn ConsistencyRule + Send + Sync>>,
}

impl ConsistencyChecker {
    /// The standard battery.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(SexAnatomyRule),
                Box::new(GallbladderStonesRule),
                Box::new(AppendixImpressionRule),
            ],
        }
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: Box<dyn ConsistencyRule + Send + Sync>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate every rule in registration order.
    pub fn check(
        &self,
        answers: &StructuredAnswers,
        patient: &PatientContext,
    ) -> Vec<ConsistencyWarning> {
        let mut warnings = Vec::new();
        for rule in &self.rules {
            if let Some(warning) = rule.evaluate(answers, patient) {
                tracing::debug!(rule = rule.name(), "Consistency rule fired");
                warnings.push(warning);
            }
        }
        warnings
    }
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}
