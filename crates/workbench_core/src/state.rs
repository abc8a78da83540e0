use crate::{
    ActionError, ClearScope, DownloadHandle, ErrorClass, FieldDescriptor, FieldRegistry, FillFormBuilder,
    FilterQuery, MutationKind, MutationOutcome, SynthesizedTemplate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NoDocument,
    DocumentLoaded,
    /// Terminal for the active document; only a reset leaves it.
    ResultReady,
}

/// Document accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub file_id: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusLine {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPanel {
    #[default]
    Idle,
    Searching { query: String },
    Results {
        query: String,
        results: Vec<FieldDescriptor>,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TemplatePanel {
    #[default]
    Empty,
    Generating,
    Ready(SynthesizedTemplate),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    pub message: String,
    pub download: DownloadHandle,
}

/// Everything the controller knows about the current session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub(crate) document: Option<DocumentInfo>,
    pub(crate) registry: FieldRegistry,
    pub(crate) builder: FillFormBuilder,
    pub(crate) query: FilterQuery,
    pub(crate) search: SearchPanel,
    pub(crate) template: TemplatePanel,
    pub(crate) phase: Phase,
    pub(crate) pending_mutation: Option<MutationKind>,
    pub(crate) pending_scope: Option<ClearScope>,
    pub(crate) upload_pending: bool,
    pub(crate) status: Option<StatusLine>,
    pub(crate) alert: Option<StatusLine>,
    pub(crate) result: Option<MutationResult>,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn builder(&self) -> &FillFormBuilder {
        &self.builder
    }

    pub fn pending_mutation(&self) -> Option<MutationKind> {
        self.pending_mutation
    }

    pub fn result(&self) -> Option<&MutationResult> {
        self.result.as_ref()
    }

    pub fn alert(&self) -> Option<&StatusLine> {
        self.alert.as_ref()
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Returns and resets the re-render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn tools_active(&self) -> bool {
        self.phase == Phase::DocumentLoaded && self.document.is_some()
    }

    pub(crate) fn active_file_id(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.file_id.as_str())
    }

    pub(crate) fn is_active_document(&self, file_id: &str) -> bool {
        self.active_file_id() == Some(file_id)
    }

    pub(crate) fn accept_document(&mut self, document: DocumentInfo) {
        self.status = Some(StatusLine::new(
            StatusKind::Success,
            format!("Uploaded: {}", document.filename),
        ));
        self.document = Some(document);
        // A mutation still in flight belongs to the replaced document.
        self.pending_mutation = None;
        self.pending_scope = None;
        self.registry.load(Vec::new());
        self.search = SearchPanel::Idle;
        self.template = TemplatePanel::Empty;
        self.phase = Phase::DocumentLoaded;
    }

    pub(crate) fn load_registry(&mut self, fields: Vec<FieldDescriptor>) {
        self.registry.load(fields);
        self.phase = Phase::DocumentLoaded;
    }

    pub(crate) fn complete_mutation(&mut self, outcome: MutationOutcome) {
        self.result = Some(MutationResult {
            message: outcome.message,
            download: DownloadHandle {
                output_id: outcome.output_id,
            },
        });
        self.alert = None;
        self.phase = Phase::ResultReady;
    }

    pub(crate) fn set_alert(&mut self, alert: StatusLine) {
        self.alert = Some(alert);
    }

    pub(crate) fn fail_action(&mut self, action: &str, err: &ActionError) {
        self.alert = Some(StatusLine::error(describe_failure(action, err)));
    }
}

/// Transport failures name the action; backend and validation messages stand alone.
pub(crate) fn describe_failure(action: &str, err: &ActionError) -> String {
    match err.class {
        ErrorClass::Transport => format!("{action} failed: {}", err.message),
        ErrorClass::Application | ErrorClass::Validation => err.message.clone(),
    }
}
