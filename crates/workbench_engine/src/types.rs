use std::fmt;
use std::path::PathBuf;

use workbench_core::{
    ActionError, DocumentInfo, ErrorClass, FieldDescriptor, MutationKind, MutationOutcome,
    TemplateEntry, TemplatePurpose,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Uploaded(Result<DocumentInfo, RequestError>),
    FieldsListed {
        file_id: String,
        result: Result<Vec<FieldDescriptor>, RequestError>,
    },
    SearchFinished {
        file_id: String,
        query: String,
        result: Result<Vec<FieldDescriptor>, RequestError>,
    },
    TemplateFetched {
        file_id: String,
        purpose: TemplatePurpose,
        result: Result<Vec<TemplateEntry>, RequestError>,
    },
    MutationFinished {
        file_id: String,
        kind: MutationKind,
        result: Result<MutationOutcome, RequestError>,
    },
    ImportRead(Result<String, RequestError>),
    ExportWritten(Result<PathBuf, RequestError>),
    DownloadSaved(Result<PathBuf, RequestError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for ActionError {
    fn from(err: RequestError) -> Self {
        let message = match err.kind {
            // The backend's own message is what the user should read.
            FailureKind::Application => err.message,
            _ => err.to_string(),
        };
        ActionError::new(err.kind.class(), message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    /// Well-formed response with `success: false`.
    Application,
    /// Response body did not have the expected shape.
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Local input rejected before any request.
    InvalidInput,
    Io,
}

impl FailureKind {
    /// Transport covers every request that produced no usable backend
    /// answer: no response at all, or a response whose body is not the
    /// expected envelope (`HttpStatus`, `Decode`, `TooLarge`). Only an
    /// envelope carrying `error` is an application failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            FailureKind::Application => ErrorClass::Application,
            FailureKind::InvalidInput | FailureKind::Io => ErrorClass::Validation,
            FailureKind::InvalidUrl
            | FailureKind::Network
            | FailureKind::Timeout
            | FailureKind::HttpStatus(_)
            | FailureKind::Decode
            | FailureKind::TooLarge { .. } => ErrorClass::Transport,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Application => write!(f, "backend error"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_responses_count_as_transport_failures() {
        for kind in [
            FailureKind::Network,
            FailureKind::Timeout,
            FailureKind::HttpStatus(502),
            FailureKind::Decode,
            FailureKind::TooLarge {
                max_bytes: 1,
                actual: Some(2),
            },
        ] {
            assert_eq!(kind.class(), ErrorClass::Transport, "{kind}");
        }
        assert_eq!(FailureKind::Application.class(), ErrorClass::Application);
        assert_eq!(FailureKind::InvalidInput.class(), ErrorClass::Validation);
    }

    #[test]
    fn undecodable_body_keeps_its_failure_kind_in_the_message() {
        let err: ActionError =
            RequestError::new(FailureKind::Decode, "expected value at line 1").into();
        assert_eq!(err.class, ErrorClass::Transport);
        assert_eq!(err.message, "unexpected response: expected value at line 1");
    }
}
