//! Error types for Autopia

use thiserror::Error;

/// Result type alias using the Autopia error
pub type Result<T> = std::result::Result<T, AutopiaError>;

/// Step name used when an error is raised without one
pub const DEFAULT_ERROR_NAME: &str = "Error";

/// Autopia error types
///
/// `Autopia` is raised by test-facing code (blocking assertions, datatable
/// and report preconditions). `Framework` is raised by the framework plumbing
/// itself (settings, run folders, report writers). Both carry the name of the
/// step that failed so callers can feed them straight back into a report.
#[derive(Error, Debug)]
pub enum AutopiaError {
    #[error("{description}")]
    Autopia { name: String, description: String },

    #[error("{description}")]
    Framework { name: String, description: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Properties error: {0}")]
    Properties(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AutopiaError {
    pub fn autopia(description: impl Into<String>) -> Self {
        Self::autopia_step(DEFAULT_ERROR_NAME, description)
    }

    pub fn autopia_step(name: impl Into<String>, description: impl Into<String>) -> Self {
        AutopiaError::Autopia {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn framework(description: impl Into<String>) -> Self {
        Self::framework_step(DEFAULT_ERROR_NAME, description)
    }

    pub fn framework_step(name: impl Into<String>, description: impl Into<String>) -> Self {
        AutopiaError::Framework {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Name of the step the error is attributed to
    pub fn name(&self) -> &str {
        match self {
            AutopiaError::Autopia { name, .. } | AutopiaError::Framework { name, .. } => name,
            _ => DEFAULT_ERROR_NAME,
        }
    }

    /// Human-readable description, without the step name
    pub fn description(&self) -> String {
        match self {
            AutopiaError::Autopia { description, .. }
            | AutopiaError::Framework { description, .. } => description.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_framework(&self) -> bool {
        matches!(self, AutopiaError::Framework { .. })
    }
}

impl From<calamine::XlsxError> for AutopiaError {
    fn from(e: calamine::XlsxError) -> Self {
        AutopiaError::Spreadsheet(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AutopiaError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AutopiaError::Spreadsheet(e.to_string())
    }
}

impl From<ini::Error> for AutopiaError {
    fn from(e: ini::Error) -> Self {
        AutopiaError::Properties(e.to_string())
    }
}
