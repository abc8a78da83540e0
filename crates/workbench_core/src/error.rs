use std::fmt;

use thiserror::Error;

/// Bulk import input that is not a well-formed mapping.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// No response was obtained.
    Transport,
    /// The backend answered with `success: false`.
    Application,
    /// Rejected on the client before any request.
    Validation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Transport => write!(f, "transport error"),
            ErrorClass::Application => write!(f, "application error"),
            ErrorClass::Validation => write!(f, "validation error"),
        }
    }
}

/// Failure of one user action. Never terminal for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub class: ErrorClass,
    pub message: String,
}

impl ActionError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Transport, message)
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Application, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, message)
    }
}

impl From<ImportError> for ActionError {
    fn from(err: ImportError) -> Self {
        ActionError::validation(format!("Invalid JSON file: {err}"))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
