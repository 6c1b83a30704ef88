use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient-level input to report synthesis. Owned by the caller and never
/// persisted or mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    pub display_name: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl PatientContext {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            sex: None,
            date_of_birth: None,
        }
    }

    pub fn with_sex(mut self, sex: &str) -> Self {
        self.sex = Some(sex.to_string());
        self
    }

    pub fn with_date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = Some(dob);
        self
    }

    /// Recorded sex, trimmed and lower-cased. Empty when unrecorded.
    pub fn normalized_sex(&self) -> String {
        self.sex
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default()
    }
}
