use crate::models::Modality;

const ULTRASOUND_FOCUS: &str = "Focus on liver, gallbladder, biliary tree, pancreas, spleen, kidneys, aorta/IVC, free fluid. \
Use ultrasound terminology (echogenicity, echotexture, etc.).";

const CT_FOCUS: &str = "Focus on phases and solid organs (liver, pancreas, spleen, adrenals, kidneys), bowel, peritoneum, nodes, vessels, bones. \
Use CT terms: attenuation, enhancement patterns, solid/cystic.";

const CHEST_XRAY_FOCUS: &str = "Focus on technique, lungs/pleura, heart/mediastinum, bones, soft tissues. \
Use CXR terminology: consolidation, effusion, pneumothorax, cardiomegaly, etc.";

/// Anatomic focus and terminology conventions for a modality.
/// Unrecognized modalities get an empty description.
pub fn focus_description(modality: &Modality) -> &'static str {
    match modality {
        Modality::AbdominalUltrasound => ULTRASOUND_FOCUS,
        Modality::AbdominalCt => CT_FOCUS,
        Modality::ChestXray => CHEST_XRAY_FOCUS,
        Modality::Other(_) => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ultrasound_focus_uses_sonographic_terms() {
        let text = focus_description(&Modality::AbdominalUltrasound);
        assert!(text.contains("gallbladder"));
        assert!(text.contains("echogenicity"));
    }

    #[test]
    fn ct_focus_mentions_enhancement() {
        let text = focus_description(&Modality::AbdominalCt);
        assert!(text.contains("attenuation"));
        assert!(text.contains("adrenals"));
    }

    #[test]
    fn chest_xray_focus_mentions_pneumothorax() {
        let text = focus_description(&Modality::ChestXray);
        assert!(text.contains("pneumothorax"));
        assert!(text.contains("lungs/pleura"));
    }

    #[test]
    fn unknown_modality_degrades_to_empty() {
        assert_eq!(focus_description(&Modality::Other("PET_CT".into())), "");
    }
}
