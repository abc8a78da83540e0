use crate::{FieldDescriptor, FieldRegistry};

/// Current text and section predicates of the field list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    pub text: String,
    pub section: String,
}

impl FilterQuery {
    pub fn new(text: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section: section.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || !self.section.is_empty()
    }
}

/// Stable projection of the registry.
///
/// `section` is an exact, case-sensitive name prefix. `text` matches the
/// name or tooltip case-insensitively. Both apply when non-empty.
pub fn filter<'a>(registry: &'a FieldRegistry, query: &FilterQuery) -> Vec<&'a FieldDescriptor> {
    let needle = query.text.to_lowercase();
    registry
        .all()
        .iter()
        .filter(|field| query.section.is_empty() || field.name.starts_with(&query.section))
        .filter(|field| needle.is_empty() || matches_text(field, &needle))
        .collect()
}

fn matches_text(field: &FieldDescriptor, needle: &str) -> bool {
    field.name.to_lowercase().contains(needle)
        || field.tooltip_or_empty().to_lowercase().contains(needle)
}

/// Stats line shown above the field list.
pub fn field_stats(shown: usize, total: usize, query: &FilterQuery) -> String {
    if query.is_active() {
        format!("Showing {shown} of {total} fields")
    } else {
        format!("Total fields: {total}")
    }
}
