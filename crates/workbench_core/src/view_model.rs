use crate::{
    field_stats, filter, EntryId, EntryValue, FieldDescriptor, FieldType, FilterQuery,
    MutationKind, Phase, SearchPanel, Session, StatusLine, TemplatePanel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Ready,
    Disabled,
    /// Disabled while its own request is in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRowView {
    pub name: String,
    pub field_type: FieldType,
    pub tooltip: Option<String>,
}

impl From<&FieldDescriptor> for FieldRowView {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            tooltip: field.tooltip.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRowView {
    pub id: EntryId,
    pub name: String,
    pub field_type: FieldType,
    pub value: EntryValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    Idle,
    Searching,
    NoMatches,
    Results(Vec<FieldRowView>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub message: String,
    pub download_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: Phase,
    pub filename: Option<String>,
    pub status: Option<StatusLine>,
    pub alert: Option<StatusLine>,
    pub filter: FilterQuery,
    pub field_stats: String,
    pub fields: Vec<FieldRowView>,
    pub search: SearchView,
    pub template_output: Option<String>,
    pub entries: Vec<EntryRowView>,
    pub fill_control: ControlState,
    pub remove_void_control: ControlState,
    pub clear_defaults_control: ControlState,
    pub upload_busy: bool,
    pub result: Option<ResultView>,
}

impl Session {
    pub fn view(&self) -> SessionView {
        let fields: Vec<FieldRowView> = filter(&self.registry, &self.query)
            .into_iter()
            .map(FieldRowView::from)
            .collect();
        SessionView {
            phase: self.phase,
            filename: self.document.as_ref().map(|doc| doc.filename.clone()),
            status: self.status.clone(),
            alert: self.alert.clone(),
            filter: self.query.clone(),
            field_stats: field_stats(fields.len(), self.registry.len(), &self.query),
            fields,
            search: self.search_view(),
            template_output: self.template_output(),
            entries: self
                .builder
                .entries()
                .iter()
                .map(|entry| EntryRowView {
                    id: entry.id,
                    name: entry.name.clone(),
                    field_type: entry.field_type.clone(),
                    value: entry.value.clone(),
                })
                .collect(),
            fill_control: self.control_state(MutationKind::Fill),
            remove_void_control: self.control_state(MutationKind::RemoveVoid),
            clear_defaults_control: self.control_state(MutationKind::ClearDefaults),
            upload_busy: self.upload_pending,
            result: self.result.as_ref().map(|result| ResultView {
                message: result.message.clone(),
                download_path: result.download.path(),
            }),
        }
    }

    fn control_state(&self, kind: MutationKind) -> ControlState {
        if self.pending_mutation == Some(kind) {
            return ControlState::Busy;
        }
        let empty_form = kind == MutationKind::Fill && !self.builder.can_submit();
        if !self.tools_active() || self.pending_mutation.is_some() || empty_form {
            ControlState::Disabled
        } else {
            ControlState::Ready
        }
    }

    fn search_view(&self) -> SearchView {
        match &self.search {
            SearchPanel::Idle => SearchView::Idle,
            SearchPanel::Searching { .. } => SearchView::Searching,
            SearchPanel::Results { results, .. } if results.is_empty() => SearchView::NoMatches,
            SearchPanel::Results { results, .. } => {
                SearchView::Results(results.iter().map(FieldRowView::from).collect())
            }
            SearchPanel::Failed(message) => SearchView::Failed(message.clone()),
        }
    }

    fn template_output(&self) -> Option<String> {
        match &self.template {
            TemplatePanel::Empty => None,
            TemplatePanel::Generating => Some("Generating template...".to_string()),
            TemplatePanel::Ready(template) => Some(template.rendering.clone()),
            TemplatePanel::Failed(message) => Some(format!("Error: {message}")),
        }
    }
}
