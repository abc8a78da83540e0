use crate::{FieldDescriptor, FieldType};

/// Field descriptors for the active document, in the order the backend listed them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole registry. There is no partial update.
    pub fn load(&mut self, fields: Vec<FieldDescriptor>) {
        self.fields = fields;
    }

    pub fn all(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// First descriptor with exactly this name; duplicates are not merged.
    pub fn find(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn type_of(&self, name: &str) -> FieldType {
        self.find(name)
            .map(|field| field.field_type.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
