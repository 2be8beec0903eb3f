use std::fmt;

use serde::Serialize;

/// A recoverable condition the user should hear about. Notices never stop a
/// layout pass; the affected value has already been corrected.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    InvalidNumericInput { field: String, message: String },
    EmptyNameList,
    MeasurementUnavailable { what: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidNumericInput { message, .. } => write!(f, "{message}"),
            Notice::EmptyNameList => write!(f, "Please enter at least one name."),
            Notice::MeasurementUnavailable { what } => {
                write!(f, "Could not measure {what}; using a fallback.")
            }
        }
    }
}
