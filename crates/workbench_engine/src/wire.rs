//! Response envelopes of the backend API.
//!
//! Every response is a JSON object with a `success` flag. Failures carry an
//! `error` message and may come with any HTTP status, so the body is checked
//! before the status.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use workbench_core::{DocumentInfo, FieldDescriptor, MutationOutcome, TemplateEntry};

use crate::{FailureKind, RequestError};

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    file_id: String,
    #[serde(default)]
    filename: String,
}

impl From<UploadResponse> for DocumentInfo {
    fn from(response: UploadResponse) -> Self {
        DocumentInfo {
            file_id: response.file_id,
            filename: response.filename,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsResponse {
    pub(crate) fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub(crate) results: Vec<FieldDescriptor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateResponse {
    template: TemplateBody,
}

/// The template arrives either as a list of entries or keyed by field name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TemplateBody {
    List(Vec<TemplateEntry>),
    Keyed(Map<String, Value>),
}

impl TemplateResponse {
    pub(crate) fn into_entries(self) -> Vec<TemplateEntry> {
        match self.template {
            TemplateBody::List(entries) => entries,
            TemplateBody::Keyed(map) => map.into_iter().map(keyed_entry).collect(),
        }
    }
}

fn keyed_entry((name, body): (String, Value)) -> TemplateEntry {
    match body {
        Value::Object(mut fields) if fields.contains_key("value") => TemplateEntry {
            name,
            value: fields.remove("value").unwrap_or(Value::Null),
            description: fields
                .remove("description")
                .and_then(|value| value.as_str().map(ToOwned::to_owned)),
        },
        plain => TemplateEntry {
            name,
            value: plain,
            description: None,
        },
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutationResponse {
    #[serde(default)]
    message: String,
    output_id: String,
}

impl From<MutationResponse> for MutationOutcome {
    fn from(response: MutationResponse) -> Self {
        MutationOutcome {
            message: response.message,
            output_id: response.output_id,
        }
    }
}

/// Checks the `success` flag and decodes the payload of a response body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, RequestError> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) if status.is_success() => {
            return Err(RequestError::new(FailureKind::Decode, err.to_string()));
        }
        Err(_) => {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
    };

    let success = value
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        return Err(match value.get("error").and_then(Value::as_str) {
            Some(message) => RequestError::new(FailureKind::Application, message),
            None if !status.is_success() => RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ),
            None => RequestError::new(FailureKind::Decode, "response without success flag"),
        });
    }

    serde_json::from_value(value).map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
}
