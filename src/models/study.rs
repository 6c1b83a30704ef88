use serde::{Deserialize, Serialize};

/// Imaging modality of a study.
///
/// Identifiers outside the known set are kept verbatim in `Other` so that a
/// newly introduced modality still produces a (less focused) draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modality {
    AbdominalUltrasound,
    AbdominalCt,
    ChestXray,
    Other(String),
}

impl Modality {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AbdominalUltrasound => "ABDOMINAL_ULTRASOUND",
            Self::AbdominalCt => "ABDOMINAL_CT",
            Self::ChestXray => "CHEST_XRAY",
            Self::Other(identifier) => identifier,
        }
    }

    /// Parse a modality identifier. Never fails.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier.trim().to_ascii_uppercase().as_str() {
            "ABDOMINAL_ULTRASOUND" => Self::AbdominalUltrasound,
            "ABDOMINAL_CT" => Self::AbdominalCt,
            "CHEST_XRAY" => Self::ChestXray,
            _ => Self::Other(identifier.trim().to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Modality {
    fn from(value: String) -> Self {
        Self::from_identifier(&value)
    }
}

impl From<Modality> for String {
    fn from(value: Modality) -> Self {
        value.as_str().to_string()
    }
}

/// Study-level input to report synthesis. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyContext {
    pub modality: Modality,
    #[serde(default)]
    pub clinical_indication: Option<String>,
}

impl StudyContext {
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            clinical_indication: None,
        }
    }

    pub fn with_indication(mut self, indication: &str) -> Self {
        self.clinical_indication = Some(indication.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_identifiers_parse() {
        assert_eq!(
            Modality::from_identifier("ABDOMINAL_ULTRASOUND"),
            Modality::AbdominalUltrasound
        );
        assert_eq!(Modality::from_identifier("abdominal_ct"), Modality::AbdominalCt);
        assert_eq!(Modality::from_identifier(" CHEST_XRAY "), Modality::ChestXray);
    }

    #[test]
    fn unknown_identifier_is_kept() {
        let modality = Modality::from_identifier("PELVIC_MRI");
        assert_eq!(modality, Modality::Other("PELVIC_MRI".into()));
        assert_eq!(modality.as_str(), "PELVIC_MRI");
        assert!(!modality.is_known());
    }

    #[test]
    fn modality_serializes_as_identifier() {
        let json = serde_json::to_string(&Modality::ChestXray).unwrap();
        assert_eq!(json, "\"CHEST_XRAY\"");

        let parsed: Modality = serde_json::from_str("\"ABDOMINAL_CT\"").unwrap();
        assert_eq!(parsed, Modality::AbdominalCt);

        let other: Modality = serde_json::from_str("\"DEXA\"").unwrap();
        assert_eq!(other, Modality::Other("DEXA".into()));
    }

    #[test]
    fn study_context_indication_defaults_to_none() {
        let study: StudyContext =
            serde_json::from_str(r#"{"modality":"ABDOMINAL_ULTRASOUND"}"#).unwrap();
        assert_eq!(study.modality, Modality::AbdominalUltrasound);
        assert!(study.clinical_indication.is_none());
    }

    #[test]
    fn builder_sets_indication() {
        let study = StudyContext::new(Modality::ChestXray).with_indication("Cough");
        assert_eq!(study.clinical_indication.as_deref(), Some("Cough"));
    }
}
