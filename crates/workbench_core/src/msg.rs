use std::path::PathBuf;

use crate::{
    ActionError, ClearScope, DocumentInfo, EntryId, ExportFormat, FieldDescriptor, FieldType,
    MutationKind, MutationOutcome, TemplateEntry, TemplatePurpose,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a document to upload.
    UploadRequested { path: PathBuf },
    /// User edited the field filter text.
    FilterTextChanged(String),
    /// User picked a section prefix; empty means all sections.
    SectionChanged(String),
    /// User submitted a backend search.
    SearchSubmitted(String),
    /// User added a blank or hand-written entry.
    AddEntry {
        name: String,
        field_type: FieldType,
        value: String,
    },
    /// User added a field from the field list.
    AddFromRegistry { name: String },
    /// User added the n-th row of the search results.
    AddFromSearch { index: usize },
    RemoveEntry(EntryId),
    RenameEntry { id: EntryId, name: String },
    EntryTextChanged { id: EntryId, text: String },
    EntryCheckedChanged { id: EntryId, checked: bool },
    /// User cleared the whole form.
    ClearForm,
    /// User picked a JSON file to import into the form.
    ImportRequested { path: PathBuf },
    /// User asked for a template preview, optionally for one section.
    TemplateRequested { section: Option<String> },
    /// User asked to export the template to a file.
    ExportRequested(ExportFormat),
    /// User clicked one of the mutation controls.
    SubmitClicked { kind: MutationKind, scope: ClearScope },
    /// User asked to save the produced artifact.
    DownloadRequested { destination: Option<PathBuf> },
    /// User clicked "start over".
    StartOver,
    /// Engine finished the upload.
    UploadDone(Result<DocumentInfo, ActionError>),
    /// Engine finished listing the fields of a document.
    FieldsLoaded {
        file_id: String,
        result: Result<Vec<FieldDescriptor>, ActionError>,
    },
    /// Engine finished a backend search.
    SearchDone {
        file_id: String,
        query: String,
        result: Result<Vec<FieldDescriptor>, ActionError>,
    },
    /// Engine fetched the template for a preview or an export.
    TemplateLoaded {
        file_id: String,
        purpose: TemplatePurpose,
        result: Result<Vec<TemplateEntry>, ActionError>,
    },
    /// Engine read the import file.
    ImportLoaded(Result<String, ActionError>),
    /// Engine finished a mutation request.
    MutationDone {
        file_id: String,
        kind: MutationKind,
        result: Result<MutationOutcome, ActionError>,
    },
    /// Engine wrote the exported template.
    ExportWritten(Result<PathBuf, ActionError>),
    /// Engine saved the downloaded artifact.
    DownloadSaved(Result<PathBuf, ActionError>),
    /// Fallback for placeholder wiring.
    NoOp,
}
