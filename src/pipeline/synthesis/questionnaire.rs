//! Intake questionnaire catalog per modality.
//!
//! Each question's `key` is the answer key the intake form submits. The
//! catalog drives the completeness report attached to every draft; it never
//! rejects a drafting request.

use serde::Serialize;

use crate::models::{Modality, QuestionKind, StructuredAnswers};
use QuestionKind::{Dropdown, Numeric, Radio, Textarea};

/// A single intake question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub section: &'static str,
    pub text: &'static str,
    pub kind: QuestionKind,
    pub options: &'static [&'static str],
    pub required: bool,
    pub unit: Option<&'static str>,
    /// Only asked when the answer to `.0` equals `.1` (case-insensitive).
    pub conditional_on: Option<(&'static str, &'static str)>,
}

impl Question {
    const fn new(
        key: &'static str,
        section: &'static str,
        text: &'static str,
        kind: QuestionKind,
        options: &'static [&'static str],
        required: bool,
    ) -> Self {
        Self {
            key,
            section,
            text,
            kind,
            options,
            required,
            unit: None,
            conditional_on: None,
        }
    }

    const fn unit(self, unit: &'static str) -> Self {
        Self {
            unit: Some(unit),
            ..self
        }
    }

    const fn when(self, key: &'static str, value: &'static str) -> Self {
        Self {
            conditional_on: Some((key, value)),
            ..self
        }
    }

    /// Whether this question applies given the answers so far.
    pub fn applies_to(&self, answers: &StructuredAnswers) -> bool {
        match self.conditional_on {
            None => true,
            Some((key, expected)) => answers
                .normalized(key)
                .is_some_and(|v| v == expected.to_lowercase()),
        }
    }
}

const YES_NO: &[&str] = &["Yes", "No"];
const PRESENT_ABSENT: &[&str] = &["Present", "Absent"];
const SIZE: &[&str] = &["Normal", "Enlarged", "Small"];
const SIDES: &[&str] = &["None", "Right", "Left", "Bilateral"];
const VISUALIZATION: &[&str] = &["Fully visualized", "Partially visualized", "Not visualized"];
const FLUID_AMOUNT: &[&str] = &["None", "Minimal", "Moderate", "Large"];
const GALLBLADDER: &[&str] = &["Present", "Surgically absent"];
const APPENDIX: &[&str] = &["Visualized", "Not visualized"];
const NO_OPTIONS: &[&str] = &[];

static ULTRASOUND_QUESTIONS: &[Question] = &[
    Question::new("fasting_status", "Clinical Information", "Patient fasting status", Radio, &["Fasting", "Non-fasting", "Unknown"], true),
    Question::new("liver_size", "Liver", "Liver size", Radio, SIZE, true),
    Question::new("liver_echotexture", "Liver", "Liver echotexture", Radio, &["Normal", "Coarse", "Heterogeneous"], true),
    Question::new("focal_liver_lesions", "Liver", "Focal liver lesions present?", Radio, YES_NO, true),
    Question::new("liver_lesion_count", "Liver", "Number of lesions", Numeric, NO_OPTIONS, true).when("focal_liver_lesions", "Yes"),
    Question::new("liver_lesion_size", "Liver", "Largest lesion size", Numeric, NO_OPTIONS, true).unit("cm").when("focal_liver_lesions", "Yes"),
    Question::new("liver_lesion_character", "Liver", "Lesion characteristics", Dropdown, &["Cystic", "Solid", "Mixed", "Calcified"], true).when("focal_liver_lesions", "Yes"),
    Question::new("gallbladder_status", "Gallbladder", "Gallbladder status", Radio, GALLBLADDER, false),
    Question::new("gallbladder_wall", "Gallbladder", "Gallbladder wall thickness", Radio, &["Normal (<3mm)", "Thickened (>3mm)"], true),
    Question::new("gallstones", "Gallbladder", "Gallstones present?", Radio, YES_NO, true),
    Question::new("gallstone_count", "Gallbladder", "Number of stones", Radio, &["Single", "Multiple"], true).when("gallstones", "Yes"),
    Question::new("gallstone_size", "Gallbladder", "Largest stone size", Numeric, NO_OPTIONS, true).unit("mm").when("gallstones", "Yes"),
    Question::new("pericholecystic_fluid", "Gallbladder", "Pericholecystic fluid", Radio, PRESENT_ABSENT, true),
    Question::new("cbd_diameter", "Bile Ducts", "Common bile duct diameter", Numeric, NO_OPTIONS, true).unit("mm"),
    Question::new("intrahepatic_duct_dilatation", "Bile Ducts", "Intrahepatic duct dilatation", Radio, YES_NO, true),
    Question::new("pancreas_visualization", "Pancreas", "Pancreas visualization", Radio, VISUALIZATION, true),
    Question::new("pancreatic_duct_diameter", "Pancreas", "Pancreatic duct diameter", Numeric, NO_OPTIONS, true).unit("mm").when("pancreas_visualization", "Fully visualized"),
    Question::new("pancreatic_lesions", "Pancreas", "Pancreatic lesions", Radio, &["Present", "Absent", "Indeterminate"], true).when("pancreas_visualization", "Fully visualized"),
    Question::new("spleen_size", "Spleen", "Spleen size", Radio, SIZE, true),
    Question::new("spleen_length", "Spleen", "Splenic length", Numeric, NO_OPTIONS, true).unit("cm"),
    Question::new("splenic_lesions", "Spleen", "Splenic lesions", Radio, PRESENT_ABSENT, true),
    Question::new("right_kidney_length", "Kidneys", "Right kidney length", Numeric, NO_OPTIONS, true).unit("cm"),
    Question::new("left_kidney_length", "Kidneys", "Left kidney length", Numeric, NO_OPTIONS, true).unit("cm"),
    Question::new("right_kidney_cortex", "Kidneys", "Right kidney cortical thickness", Radio, &["Normal", "Thinned"], true),
    Question::new("left_kidney_cortex", "Kidneys", "Left kidney cortical thickness", Radio, &["Normal", "Thinned"], true),
    Question::new("hydronephrosis", "Kidneys", "Hydronephrosis", Radio, SIDES, true),
    Question::new("renal_calculi", "Kidneys", "Renal calculi", Radio, SIDES, true),
    Question::new("renal_masses", "Kidneys", "Renal masses", Radio, SIDES, true),
    Question::new("aorta_visualization", "Aorta", "Abdominal aorta visualization", Radio, VISUALIZATION, true),
    Question::new("aorta_max_diameter", "Aorta", "Maximum aortic diameter", Numeric, NO_OPTIONS, true).unit("mm").when("aorta_visualization", "Fully visualized"),
    Question::new("aortic_aneurysm", "Aorta", "Aneurysm present", Radio, YES_NO, true).when("aorta_visualization", "Fully visualized"),
    Question::new("ascites", "Other Findings", "Ascites", Radio, FLUID_AMOUNT, true),
    Question::new("lymphadenopathy", "Other Findings", "Lymphadenopathy", Radio, PRESENT_ABSENT, true),
    Question::new("appendix_visualized", "Other Findings", "Appendix visualization", Radio, APPENDIX, false),
    Question::new("impression_hint", "Impression", "Suggested impression", Textarea, NO_OPTIONS, false),
    Question::new("additional_findings", "Other Findings", "Additional findings", Textarea, NO_OPTIONS, false),
];

static CT_QUESTIONS: &[Question] = &[
    Question::new("contrast", "Technical", "Contrast administration", Radio, &["IV contrast", "Oral contrast", "Both", "Non-contrast"], true),
    Question::new("scan_phase", "Technical", "Scan phase", Dropdown, &["Arterial", "Portal venous", "Delayed", "Multi-phase"], true),
    Question::new("liver_size", "Liver", "Liver size", Radio, SIZE, true),
    Question::new("liver_contour", "Liver", "Liver contour", Radio, &["Smooth", "Nodular", "Irregular"], true),
    Question::new("liver_attenuation", "Liver", "Liver attenuation", Radio, &["Normal", "Decreased (fatty)", "Increased"], true),
    Question::new("focal_liver_lesions", "Liver", "Focal liver lesions", Radio, YES_NO, true),
    Question::new("liver_lesion_count", "Liver", "Number of lesions", Numeric, NO_OPTIONS, true).when("focal_liver_lesions", "Yes"),
    Question::new("liver_lesion_size", "Liver", "Largest lesion size", Numeric, NO_OPTIONS, true).unit("cm").when("focal_liver_lesions", "Yes"),
    Question::new("liver_lesion_enhancement", "Liver", "Lesion enhancement pattern", Dropdown, &["Hypervascular", "Hypovascular", "Cystic", "Calcified", "Mixed"], true).when("focal_liver_lesions", "Yes"),
    Question::new("gallbladder_status", "Gallbladder", "Gallbladder status", Radio, GALLBLADDER, false),
    Question::new("gallbladder_wall", "Gallbladder", "Gallbladder wall thickness", Radio, &["Normal", "Thickened"], true),
    Question::new("gallstones", "Gallbladder", "Gallstones", Radio, PRESENT_ABSENT, true),
    Question::new("pericholecystic_fluid", "Gallbladder", "Pericholecystic fluid/stranding", Radio, PRESENT_ABSENT, true),
    Question::new("cbd_diameter", "Bile Ducts", "Common bile duct diameter", Numeric, NO_OPTIONS, true).unit("mm"),
    Question::new("intrahepatic_duct_dilatation", "Bile Ducts", "Intrahepatic duct dilatation", Radio, YES_NO, true),
    Question::new("pancreas_size", "Pancreas", "Pancreatic size", Radio, &["Normal", "Enlarged", "Atrophic"], true),
    Question::new("pancreatic_duct_diameter", "Pancreas", "Pancreatic duct diameter", Numeric, NO_OPTIONS, true).unit("mm"),
    Question::new("pancreatic_enhancement", "Pancreas", "Pancreatic enhancement", Radio, &["Normal", "Decreased", "Heterogeneous"], true),
    Question::new("pancreatic_mass", "Pancreas", "Pancreatic mass", Radio, PRESENT_ABSENT, true),
    Question::new("peripancreatic_fluid", "Pancreas", "Peripancreatic fluid/stranding", Radio, PRESENT_ABSENT, true),
    Question::new("spleen_size", "Spleen", "Spleen size", Radio, SIZE, true),
    Question::new("splenic_lesions", "Spleen", "Splenic lesions", Radio, PRESENT_ABSENT, true),
    Question::new("right_kidney_size", "Kidneys", "Right kidney size", Radio, SIZE, true),
    Question::new("left_kidney_size", "Kidneys", "Left kidney size", Radio, SIZE, true),
    Question::new("renal_enhancement", "Kidneys", "Renal enhancement", Radio, &["Symmetric", "Asymmetric"], true),
    Question::new("hydronephrosis", "Kidneys", "Hydronephrosis", Radio, SIDES, true),
    Question::new("renal_calculi", "Kidneys", "Renal calculi", Radio, SIDES, true),
    Question::new("renal_masses", "Kidneys", "Renal masses", Radio, SIDES, true),
    Question::new("adrenal_glands", "Adrenals", "Adrenal glands", Radio, &["Normal", "Nodule/mass present", "Thickened"], true),
    Question::new("bowel_wall_thickening", "Bowel", "Bowel wall thickening", Radio, &["None", "Small bowel", "Colon", "Both"], true),
    Question::new("bowel_obstruction", "Bowel", "Bowel obstruction", Radio, &["None", "Small bowel", "Large bowel"], true),
    Question::new("pneumatosis", "Bowel", "Pneumatosis", Radio, PRESENT_ABSENT, true),
    Question::new("appendix_visualized", "Bowel", "Appendix visualization", Radio, APPENDIX, false),
    Question::new("aorta_diameter", "Vessels", "Abdominal aorta diameter", Numeric, NO_OPTIONS, true).unit("mm"),
    Question::new("aortic_aneurysm", "Vessels", "Aortic aneurysm", Radio, PRESENT_ABSENT, true),
    Question::new("portal_vein", "Vessels", "Portal vein patency", Radio, &["Patent", "Thrombosed", "Partially thrombosed"], true),
    Question::new("mesenteric_vessels", "Vessels", "Mesenteric vessels", Radio, &["Normal", "Abnormal"], true),
    Question::new("lymphadenopathy", "Lymph Nodes", "Lymphadenopathy", Radio, &["None", "Mesenteric", "Retroperitoneal", "Both"], true),
    Question::new("largest_node_size", "Lymph Nodes", "Largest node size", Numeric, NO_OPTIONS, true).unit("mm").when("lymphadenopathy", "Mesenteric"),
    Question::new("ascites", "Peritoneum", "Ascites", Radio, FLUID_AMOUNT, true),
    Question::new("peritoneal_thickening", "Peritoneum", "Peritoneal thickening/nodularity", Radio, PRESENT_ABSENT, true),
    Question::new("free_air", "Other", "Free air", Radio, PRESENT_ABSENT, true),
    Question::new("hernias", "Other", "Hernias", Radio, &["None", "Inguinal", "Umbilical", "Incisional", "Other"], true),
    Question::new("impression_hint", "Impression", "Suggested impression", Textarea, NO_OPTIONS, false),
    Question::new("additional_findings", "Other", "Additional findings", Textarea, NO_OPTIONS, false),
];

static CHEST_XRAY_QUESTIONS: &[Question] = &[
    Question::new("projection", "Technical", "Projection", Radio, &["PA", "AP", "Lateral", "PA and Lateral"], true),
    Question::new("patient_position", "Technical", "Patient position", Radio, &["Erect", "Supine", "Semi-erect"], true),
    Question::new("inspiration", "Technical", "Inspiration", Radio, &["Adequate", "Inadequate"], true),
    Question::new("rotation", "Technical", "Rotation", Radio, &["None", "Mild", "Moderate"], true),
    Question::new("penetration", "Technical", "Penetration", Radio, &["Adequate", "Underpenetrated", "Overpenetrated"], true),
    Question::new("trachea_position", "Airways", "Trachea position", Radio, &["Midline", "Deviated right", "Deviated left"], true),
    Question::new("carina_angle", "Airways", "Carina angle", Radio, &["Normal", "Widened", "Narrowed"], true),
    Question::new("lung_volumes", "Lungs", "Lung volumes", Radio, &["Normal", "Hyperinflated", "Reduced"], true),
    Question::new("airspace_opacification", "Lungs", "Airspace opacification", Radio, &["None", "Right upper", "Right middle", "Right lower", "Left upper", "Left lower", "Bilateral"], true),
    Question::new("interstitial_pattern", "Lungs", "Interstitial pattern", Radio, &["None", "Reticular", "Nodular", "Reticulonodular"], true),
    Question::new("nodules_masses", "Lungs", "Nodules/masses", Radio, &["None", "Solitary nodule", "Multiple nodules", "Mass"], true),
    Question::new("cavitation", "Lungs", "Cavitation", Radio, PRESENT_ABSENT, true),
    Question::new("pleural_effusion", "Pleura", "Pleural effusion", Radio, &["None", "Right small", "Right moderate", "Right large", "Left small", "Left moderate", "Left large", "Bilateral"], true),
    Question::new("pneumothorax", "Pleura", "Pneumothorax", Radio, &["None", "Right small", "Right large", "Left small", "Left large", "Bilateral"], true),
    Question::new("pleural_thickening", "Pleura", "Pleural thickening", Radio, SIDES, true),
    Question::new("cardiac_size", "Heart", "Cardiac size", Radio, SIZE, true),
    Question::new("cardiothoracic_ratio", "Heart", "Cardiothoracic ratio", Radio, &["<0.5", "0.5-0.6", ">0.6"], true),
    Question::new("cardiac_contour", "Heart", "Cardiac contour", Radio, &["Normal", "Abnormal"], true),
    Question::new("mediastinal_contour", "Mediastinum", "Mediastinal contour", Radio, &["Normal", "Widened", "Mass/adenopathy"], true),
    Question::new("hilar_prominence", "Mediastinum", "Hilar prominence", Radio, SIDES, true),
    Question::new("rib_fractures", "Bones", "Rib fractures", Radio, SIDES, true),
    Question::new("bone_lesions", "Bones", "Bone lesions", Radio, &["None", "Lytic", "Sclerotic", "Mixed"], true),
    Question::new("spine_alignment", "Bones", "Spine alignment", Radio, &["Normal", "Scoliosis", "Kyphosis"], true),
    Question::new("subcutaneous_emphysema", "Soft Tissues", "Subcutaneous emphysema", Radio, PRESENT_ABSENT, true),
    Question::new("lines_tubes", "Lines & Tubes", "Lines/tubes present", Radio, &["None", "Present"], true),
    Question::new("ett_position", "Lines & Tubes", "ETT position", Radio, &["Not present", "Satisfactory", "Too high", "Too low"], true).when("lines_tubes", "Present"),
    Question::new("ngt_position", "Lines & Tubes", "NGT position", Radio, &["Not present", "Satisfactory", "Malpositioned"], true).when("lines_tubes", "Present"),
    Question::new("central_line_position", "Lines & Tubes", "Central line position", Radio, &["Not present", "Satisfactory", "Malpositioned"], true).when("lines_tubes", "Present"),
    Question::new("impression_hint", "Impression", "Suggested impression", Textarea, NO_OPTIONS, false),
    Question::new("additional_findings", "Other", "Additional findings", Textarea, NO_OPTIONS, false),
];

/// The intake questions for a modality. Unknown modalities have none.
pub fn questions_for(modality: &Modality) -> &'static [Question] {
    match modality {
        Modality::AbdominalUltrasound => ULTRASOUND_QUESTIONS,
        Modality::AbdominalCt => CT_QUESTIONS,
        Modality::ChestXray => CHEST_XRAY_QUESTIONS,
        Modality::Other(_) => &[],
    }
}

/// Keys of required, applicable questions that have no answer, in
/// questionnaire order.
pub fn unanswered_required(modality: &Modality, answers: &StructuredAnswers) -> Vec<&'static str> {
    questions_for(modality)
        .iter()
        .filter(|q| q.required && q.applies_to(answers))
        .filter(|q| !answers.is_answered(q.key))
        .map(|q| q.key)
        .collect()
}
