use std::fmt;

use serde_json::{Map, Value};

use crate::{EntryValue, FillFormBuilder};

/// Value sent for a checked checkbox.
pub const CHECKED_VALUE: &str = "Yes";
/// Value sent for an unchecked checkbox.
pub const UNCHECKED_VALUE: &str = "Off";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Fill,
    RemoveVoid,
    ClearDefaults,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Fill => write!(f, "fill"),
            MutationKind::RemoveVoid => write!(f, "remove-void"),
            MutationKind::ClearDefaults => write!(f, "clear-defaults"),
        }
    }
}

/// Which fields a clear-defaults request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Every field of the document (sent as `null`).
    All,
    /// The fields named in the current form.
    FormFields,
}

/// Body of one mutation request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    Fill { fields: Map<String, Value> },
    RemoveVoid,
    ClearDefaults { fields: Option<Map<String, Value>> },
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::Fill { .. } => MutationKind::Fill,
            MutationRequest::RemoveVoid => MutationKind::RemoveVoid,
            MutationRequest::ClearDefaults { .. } => MutationKind::ClearDefaults,
        }
    }
}

/// Result message shown after clearing every default value.
pub const CLEARED_ALL_MESSAGE: &str = "Cleared all default values";

/// Backend answer to a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub message: String,
    pub output_id: String,
}

/// Reference to a produced artifact on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle {
    pub output_id: String,
}

impl DownloadHandle {
    pub fn path(&self) -> String {
        format!("/api/download/{}", self.output_id)
    }
}

/// Name→value payload of the current form.
///
/// Unnamed entries are skipped. A repeated name keeps its first position
/// and takes the last value.
pub fn snapshot(builder: &FillFormBuilder) -> Map<String, Value> {
    let mut fields = Map::new();
    for entry in builder.entries() {
        if entry.name.is_empty() {
            continue;
        }
        let value = match &entry.value {
            EntryValue::Checked(true) => CHECKED_VALUE.to_string(),
            EntryValue::Checked(false) => UNCHECKED_VALUE.to_string(),
            EntryValue::Text(text) => text.clone(),
        };
        fields.insert(entry.name.clone(), Value::String(value));
    }
    fields
}

pub fn build_request(
    kind: MutationKind,
    scope: ClearScope,
    builder: &FillFormBuilder,
) -> MutationRequest {
    match kind {
        MutationKind::Fill => MutationRequest::Fill {
            fields: snapshot(builder),
        },
        MutationKind::RemoveVoid => MutationRequest::RemoveVoid,
        MutationKind::ClearDefaults => MutationRequest::ClearDefaults {
            fields: match scope {
                ClearScope::All => None,
                ClearScope::FormFields => Some(snapshot(builder)),
            },
        },
    }
}
