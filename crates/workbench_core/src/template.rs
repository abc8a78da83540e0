use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One default value of the document template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub description: Option<String>,
}

impl TemplateEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn annotation(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

/// Where a synthesized template is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePurpose {
    Preview,
    Export(ExportFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// The annotated rendering shown in the preview.
    #[default]
    Annotated,
    /// Strict JSON of the canonical mapping.
    Canonical,
}

/// Canonical mapping plus the annotated rendering of the same entries.
///
/// The rendering carries `// description` comments and is not strict JSON;
/// use [`SynthesizedTemplate::canonical_json`] when the output must re-parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedTemplate {
    pub canonical: Map<String, Value>,
    pub rendering: String,
}

impl SynthesizedTemplate {
    pub fn canonical_json(&self) -> String {
        // Serializing a map of JSON values cannot fail.
        serde_json::to_string_pretty(&self.canonical).unwrap_or_default()
    }

    pub fn artifact(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Annotated => self.rendering.clone(),
            ExportFormat::Canonical => self.canonical_json(),
        }
    }
}

pub fn synthesize(entries: &[TemplateEntry]) -> SynthesizedTemplate {
    let canonical = entries
        .iter()
        .map(|entry| (entry.name.clone(), entry.value.clone()))
        .collect();
    SynthesizedTemplate {
        canonical,
        rendering: render_annotated(entries),
    }
}

fn render_annotated(entries: &[TemplateEntry]) -> String {
    let mut out = String::from("{\n");
    let last = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        let separator = if index == last { "" } else { "," };
        let _ = write!(
            out,
            "  {}: {}{}",
            Value::String(entry.name.clone()),
            entry.value,
            separator
        );
        if let Some(description) = entry.annotation() {
            let _ = write!(out, " // {description}");
        }
        out.push('\n');
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_template_renders_braces_only() {
        let template = synthesize(&[]);
        assert_eq!(template.rendering, "{\n}");
        assert!(template.canonical.is_empty());
    }

    #[test]
    fn names_are_json_escaped() {
        let template = synthesize(&[TemplateEntry::new("say \"hi\"", "")]);
        assert_eq!(template.rendering, "{\n  \"say \\\"hi\\\"\": \"\"\n}");
    }

    #[test]
    fn empty_description_is_not_annotated() {
        let template = synthesize(&[TemplateEntry::new("A", "").described("")]);
        assert_eq!(template.rendering, "{\n  \"A\": \"\"\n}");
    }
}
