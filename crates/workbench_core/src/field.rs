use std::fmt;

use serde::{Deserialize, Serialize};

/// Field type tag as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Checkbox,
    Choice,
    Signature,
    Unknown,
    /// Any tag the backend sends that has no dedicated variant.
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Choice => "choice",
            FieldType::Signature => "signature",
            FieldType::Unknown => "unknown",
            FieldType::Other(tag) => tag,
        }
    }

    pub fn is_checkbox(&self) -> bool {
        matches!(self, FieldType::Checkbox)
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => FieldType::Text,
            "checkbox" => FieldType::Checkbox,
            "choice" => FieldType::Choice,
            "signature" => FieldType::Signature,
            "unknown" => FieldType::Unknown,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from(tag.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fillable field discovered in the active document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tooltip: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn tooltip_or_empty(&self) -> &str {
        self.tooltip.as_deref().unwrap_or("")
    }
}

/// The backend reports a missing tooltip as `""` or `null`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_are_preserved() {
        let ft = FieldType::from("radio");
        assert_eq!(ft, FieldType::Other("radio".to_string()));
        assert_eq!(ft.to_string(), "radio");
    }

    #[test]
    fn descriptor_decodes_backend_shape() {
        let raw = r#"{"name":"Page1.Name","type":"checkbox","tooltip":"","value":"Off"}"#;
        let field: FieldDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(field.name, "Page1.Name");
        assert_eq!(field.field_type, FieldType::Checkbox);
        assert_eq!(field.tooltip, None);
    }

    #[test]
    fn descriptor_without_type_defaults_to_text() {
        let field: FieldDescriptor = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
    }
}
