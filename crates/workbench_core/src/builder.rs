use std::fmt;

use serde_json::{Map, Value};

use crate::{FieldRegistry, FieldType, ImportError};

/// Keys starting with this prefix are comments/metadata and never imported.
pub const RESERVED_KEY_PREFIX: char = '_';

/// Session-unique handle of a fill-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    Text(String),
    Checked(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillEntry {
    pub id: EntryId,
    pub name: String,
    pub field_type: FieldType,
    pub value: EntryValue,
}

impl FillEntry {
    fn new(id: EntryId, name: String, field_type: FieldType, value: &str) -> Self {
        let value = if field_type.is_checkbox() {
            EntryValue::Checked(value == "Yes")
        } else {
            EntryValue::Text(value.to_string())
        };
        Self {
            id,
            name,
            field_type,
            value,
        }
    }
}

/// Ordered, user-editable list of fill-entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillFormBuilder {
    entries: Vec<FillEntry>,
    next_id: u64,
}

impl Default for FillFormBuilder {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl FillFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fill control is only offered while the form has entries.
    pub fn can_submit(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&FillEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn add(&mut self, name: impl Into<String>, field_type: FieldType, value: &str) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries
            .push(FillEntry::new(id, name.into(), field_type, value));
        id
    }

    /// Removes the entry with `id`; returns false when it was not present.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Empties the form. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn rename(&mut self, id: EntryId, name: impl Into<String>) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: EntryId, text: impl Into<String>) -> bool {
        match self.entry_mut(id) {
            Some(FillEntry {
                value: EntryValue::Text(current),
                ..
            }) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_checked(&mut self, id: EntryId, checked: bool) -> bool {
        match self.entry_mut(id) {
            Some(FillEntry {
                value: EntryValue::Checked(current),
                ..
            }) => {
                *current = checked;
                true
            }
            _ => false,
        }
    }

    /// Replaces the form with the entries of a JSON object.
    ///
    /// The input is parsed before anything is touched, so a failed import
    /// leaves the current entries as they were. Returns the number of
    /// entries added.
    pub fn bulk_load(&mut self, raw: &str, registry: &FieldRegistry) -> Result<usize, ImportError> {
        let mapping = parse_mapping(raw)?;
        self.clear();
        let mut added = 0;
        for (key, value) in mapping {
            if key.starts_with(RESERVED_KEY_PREFIX) {
                continue;
            }
            let field_type = registry.type_of(&key);
            let text = import_value_text(&field_type, &value);
            self.add(key, field_type, &text);
            added += 1;
        }
        Ok(added)
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut FillEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }
}

fn parse_mapping(raw: &str) -> Result<Map<String, Value>, ImportError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(mapping) => Ok(mapping),
        other => Err(ImportError::NotAnObject(json_kind(&other))),
    }
}

fn import_value_text(field_type: &FieldType, value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) if field_type.is_checkbox() => "Yes".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
