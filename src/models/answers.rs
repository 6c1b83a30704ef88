use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single structured answer as supplied by the intake questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Missing,
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Display form of the value.
    pub fn as_text(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Flag(true) => "yes".to_string(),
            Self::Flag(false) => "no".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Choices(items) => items.join(", "),
        }
    }

    /// Trimmed, lower-cased display form used for rule matching.
    pub fn normalized(&self) -> String {
        self.as_text().trim().to_lowercase()
    }

    /// Whether the answer carries a value at all. Blank text, zero, `false`,
    /// an empty selection and null all count as not answered.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Flag(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choices(items) => items.iter().any(|i| !i.trim().is_empty()),
        }
    }

    /// Whether the questionnaire field was filled in. Unlike `is_present`,
    /// `false` and `0` are real answers here.
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Flag(_) | Self::Number(_) => true,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Choices(items) => items.iter().any(|i| !i.trim().is_empty()),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or(Self::Missing)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        Self::Choices(value)
    }
}

/// Structured answer set keyed by answer key. Iteration is in sorted key
/// order, which is also the order used when rendering prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredAnswers(BTreeMap<String, AnswerValue>);

impl StructuredAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<AnswerValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.0.get(key)
    }

    /// Normalized text of a present answer.
    pub fn normalized(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| v.is_present())
            .map(AnswerValue::normalized)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(AnswerValue::is_present)
    }

    pub fn is_answered(&self, key: &str) -> bool {
        self.get(key).is_some_and(AnswerValue::is_answered)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AnswerValue)> for StructuredAnswers {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mixed_values() {
        let answers: StructuredAnswers = serde_json::from_str(
            r#"{
                "liver": "Normal",
                "cbd_diameter_mm": 4,
                "gallstones": true,
                "hydronephrosis": ["Right", "Left"],
                "notes": null
            }"#,
        )
        .unwrap();

        assert_eq!(answers.get("liver"), Some(&AnswerValue::Text("Normal".into())));
        assert_eq!(answers.get("cbd_diameter_mm"), Some(&AnswerValue::from(4i64)));
        assert_eq!(answers.get("gallstones"), Some(&AnswerValue::Flag(true)));
        assert_eq!(
            answers.get("hydronephrosis").map(AnswerValue::as_text),
            Some("Right, Left".to_string())
        );
        assert_eq!(answers.get("notes"), Some(&AnswerValue::Missing));
    }

    #[test]
    fn iteration_is_sorted_by_key() {
        let answers = StructuredAnswers::new()
            .with("spleen", "Normal")
            .with("aorta", "Normal")
            .with("liver", "Normal");
        let keys: Vec<&str> = answers.keys().collect();
        assert_eq!(keys, vec!["aorta", "liver", "spleen"]);
    }

    #[test]
    fn presence_rules() {
        assert!(!AnswerValue::Missing.is_present());
        assert!(!AnswerValue::Text("  ".into()).is_present());
        assert!(!AnswerValue::Flag(false).is_present());
        assert!(!AnswerValue::from(0i64).is_present());
        assert!(!AnswerValue::Choices(vec![]).is_present());
        assert!(AnswerValue::Text("Present".into()).is_present());
        assert!(AnswerValue::from(2.5f64).is_present());
    }

    #[test]
    fn zero_and_false_count_as_answered() {
        assert!(AnswerValue::from(0i64).is_answered());
        assert!(AnswerValue::Flag(false).is_answered());
        assert!(!AnswerValue::Missing.is_answered());
        assert!(!AnswerValue::Text(String::new()).is_answered());
    }

    #[test]
    fn normalized_skips_absent_answers() {
        let answers = StructuredAnswers::new()
            .with("gallbladder_status", " Surgically Absent ")
            .with("gallstones", "");
        assert_eq!(
            answers.normalized("gallbladder_status").as_deref(),
            Some("surgically absent")
        );
        assert_eq!(answers.normalized("gallstones"), None);
        assert_eq!(answers.normalized("appendix_visualized"), None);
    }

    #[test]
    fn non_finite_float_is_missing() {
        assert_eq!(AnswerValue::from(f64::NAN), AnswerValue::Missing);
    }
}
