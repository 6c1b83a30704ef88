use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored enum value did not match any known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ReportState {
    NoDraft => "no_draft",
    Draft => "draft",
    Finalized => "finalized",
});

impl Default for ReportState {
    fn default() -> Self {
        Self::NoDraft
    }
}

str_enum!(StudyStatus {
    Draft => "draft",
    Finalized => "finalized",
});

str_enum!(QuestionKind {
    Radio => "radio",
    Dropdown => "dropdown",
    Numeric => "numeric",
    Text => "text",
    Textarea => "textarea",
});
