pub mod answers;
pub mod enums;
pub mod patient;
pub mod study;

pub use answers::{AnswerValue, StructuredAnswers};
pub use enums::{InvalidEnum, QuestionKind, ReportState, StudyStatus};
pub use patient::PatientContext;
pub use study::{Modality, StudyContext};
