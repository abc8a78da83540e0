use pretty_assertions::assert_eq;
use workbench_core::{
    EntryId, EntryValue, FieldDescriptor, FieldRegistry, FieldType, FillFormBuilder, ImportError,
};

fn names(builder: &FillFormBuilder) -> Vec<&str> {
    builder
        .entries()
        .iter()
        .map(|entry| entry.name.as_str())
        .collect()
}

#[test]
fn add_then_remove_restores_previous_entries() {
    let mut builder = FillFormBuilder::new();
    builder.add("A", FieldType::Text, "1");
    builder.add("B", FieldType::Text, "2");
    let before = builder.entries().to_vec();

    let id = builder.add("C", FieldType::Text, "");
    assert!(builder.can_submit());
    assert!(builder.remove(id));

    assert_eq!(builder.entries(), before.as_slice());
}

#[test]
fn removing_middle_entry_keeps_order() {
    let mut builder = FillFormBuilder::new();
    builder.add("A", FieldType::Text, "");
    let b = builder.add("B", FieldType::Text, "");
    builder.add("C", FieldType::Text, "");

    builder.remove(b);
    assert_eq!(names(&builder), vec!["A", "C"]);
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut builder = FillFormBuilder::new();
    builder.add("A", FieldType::Text, "");
    assert!(!builder.remove(EntryId(999)));
    assert_eq!(builder.len(), 1);
}

#[test]
fn emptying_the_form_disables_submit() {
    let mut builder = FillFormBuilder::new();
    assert!(!builder.can_submit());
    let id = builder.add("", FieldType::Text, "");
    assert!(builder.can_submit());
    builder.remove(id);
    assert!(!builder.can_submit());

    builder.add("A", FieldType::Text, "");
    builder.clear();
    assert!(!builder.can_submit());
}

#[test]
fn bulk_load_skips_reserved_keys_and_keeps_document_order() {
    let mut builder = FillFormBuilder::new();
    let registry = FieldRegistry::new();

    let added = builder
        .bulk_load(r#"{"_note":"x","B":"2","A":"1"}"#, &registry)
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(names(&builder), vec!["B", "A"]);
    assert_eq!(
        builder.entries()[1].value,
        EntryValue::Text("1".to_string())
    );
}

#[test]
fn bulk_load_spec_example() {
    let mut builder = FillFormBuilder::new();
    builder
        .bulk_load(r#"{"_note":"x","A":"1","B":"2"}"#, &FieldRegistry::new())
        .unwrap();
    assert_eq!(names(&builder), vec!["A", "B"]);
}

#[test]
fn bulk_load_resolves_types_from_registry() {
    let mut registry = FieldRegistry::new();
    registry.load(vec![FieldDescriptor::new("Signed", FieldType::Checkbox)]);
    let mut builder = FillFormBuilder::new();

    builder
        .bulk_load(r#"{"Signed":"Yes","Other":"x"}"#, &registry)
        .unwrap();

    let entries = builder.entries();
    assert_eq!(entries[0].field_type, FieldType::Checkbox);
    assert_eq!(entries[0].value, EntryValue::Checked(true));
    assert_eq!(entries[1].field_type, FieldType::Text);
}

#[test]
fn bulk_load_replaces_existing_entries() {
    let mut builder = FillFormBuilder::new();
    builder.add("Old", FieldType::Text, "");
    builder
        .bulk_load(r#"{"New":"v"}"#, &FieldRegistry::new())
        .unwrap();
    assert_eq!(names(&builder), vec!["New"]);
}

#[test]
fn unparsable_import_leaves_builder_untouched() {
    let mut builder = FillFormBuilder::new();
    builder.add("Keep", FieldType::Text, "me");
    let before = builder.clone();

    let err = builder
        .bulk_load("{not json", &FieldRegistry::new())
        .unwrap_err();
    assert!(matches!(err, ImportError::Json(_)));
    assert_eq!(builder, before);

    let err = builder
        .bulk_load(r#"["A","B"]"#, &FieldRegistry::new())
        .unwrap_err();
    assert!(matches!(err, ImportError::NotAnObject("array")));
    assert_eq!(builder, before);
}

#[test]
fn edits_apply_by_id() {
    let mut builder = FillFormBuilder::new();
    let id = builder.add("", FieldType::Text, "");
    assert!(builder.rename(id, "Name"));
    assert!(builder.set_text(id, "Ada"));
    let entry = builder.get(id).unwrap();
    assert_eq!(entry.name, "Name");
    assert_eq!(entry.value, EntryValue::Text("Ada".to_string()));
    assert!(!builder.rename(EntryId(42), "x"));
}
