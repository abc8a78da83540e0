use std::path::Path;

use crate::state::describe_failure;
use crate::{
    build_request, synthesize, ActionError, ClearScope, Effect, ExportFormat, MutationKind, Msg,
    Phase, SearchPanel, Session, StatusKind, StatusLine, TemplateEntry, TemplatePanel,
    TemplatePurpose, CLEARED_ALL_MESSAGE, EXPORT_FILENAME,
};

const UPLOAD_EXTENSION: &str = "pdf";

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut state: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::UploadRequested { path } => request_upload(&mut state, &path),
        Msg::UploadDone(result) => {
            if !state.upload_pending {
                // Arrived after a reset.
                return (state, Vec::new());
            }
            state.upload_pending = false;
            state.mark_dirty();
            match result {
                // The active document already produced its result.
                Ok(_) if state.phase == Phase::ResultReady => Vec::new(),
                Ok(document) => {
                    let file_id = document.file_id.clone();
                    state.accept_document(document);
                    vec![Effect::ListFields { file_id }]
                }
                Err(err) => {
                    state.status = Some(StatusLine::error(describe_failure("Upload", &err)));
                    Vec::new()
                }
            }
        }
        Msg::FieldsLoaded { file_id, result } => {
            if !state.is_active_document(&file_id) || state.phase == Phase::ResultReady {
                return (state, Vec::new());
            }
            match result {
                Ok(fields) => state.load_registry(fields),
                Err(err) => {
                    state.status = Some(StatusLine::error(describe_failure(
                        "Loading fields",
                        &err,
                    )));
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::FilterTextChanged(text) => {
            if state.tools_active() && state.query.text != text {
                state.query.text = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SectionChanged(section) => {
            if state.tools_active() && state.query.section != section {
                state.query.section = section;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SearchSubmitted(raw) => submit_search(&mut state, raw.trim()),
        Msg::SearchDone {
            file_id,
            query,
            result,
        } => {
            let awaited = matches!(
                &state.search,
                SearchPanel::Searching { query: pending } if *pending == query
            );
            if !awaited || !state.is_active_document(&file_id) {
                return (state, Vec::new());
            }
            state.search = match result {
                Ok(results) => SearchPanel::Results { query, results },
                Err(err) => SearchPanel::Failed(describe_failure("Search", &err)),
            };
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddEntry {
            name,
            field_type,
            value,
        } => {
            if state.tools_active() {
                state.builder.add(name, field_type, &value);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AddFromRegistry { name } => {
            if !state.tools_active() {
                return (state, Vec::new());
            }
            match state.registry.find(&name).map(|field| field.field_type.clone()) {
                Some(field_type) => {
                    state.builder.add(name, field_type, "");
                }
                None => state.set_alert(StatusLine::error(format!("Unknown field: {name}"))),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::AddFromSearch { index } => {
            if !state.tools_active() {
                return (state, Vec::new());
            }
            let picked = match &state.search {
                SearchPanel::Results { results, .. } => results
                    .get(index)
                    .map(|field| (field.name.clone(), field.field_type.clone())),
                _ => None,
            };
            if let Some((name, field_type)) = picked {
                state.builder.add(name, field_type, "");
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RemoveEntry(id) => {
            if state.tools_active() && state.builder.remove(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RenameEntry { id, name } => {
            if state.tools_active() && state.builder.rename(id, name) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EntryTextChanged { id, text } => {
            if state.tools_active() && state.builder.set_text(id, text) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EntryCheckedChanged { id, checked } => {
            if state.tools_active() && state.builder.set_checked(id, checked) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ClearForm => {
            if state.tools_active() && !state.builder.is_empty() {
                state.builder.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ImportRequested { path } => {
            if state.tools_active() {
                vec![Effect::ReadImport { path }]
            } else {
                Vec::new()
            }
        }
        Msg::ImportLoaded(result) => {
            if !state.tools_active() {
                return (state, Vec::new());
            }
            let outcome = result.and_then(|raw| {
                state
                    .builder
                    .bulk_load(&raw, &state.registry)
                    .map_err(ActionError::from)
            });
            match outcome {
                Ok(count) => state.set_alert(StatusLine::new(
                    StatusKind::Success,
                    format!("Imported {count} fields"),
                )),
                Err(err) => state.fail_action("Import", &err),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::TemplateRequested { section } => {
            let Some(file_id) = tools_file_id(&state) else {
                return (state, Vec::new());
            };
            state.template = TemplatePanel::Generating;
            state.mark_dirty();
            vec![Effect::FetchTemplate {
                file_id,
                section: section.filter(|s| !s.is_empty()),
                purpose: TemplatePurpose::Preview,
            }]
        }
        Msg::ExportRequested(format) => match tools_file_id(&state) {
            Some(file_id) => vec![Effect::FetchTemplate {
                file_id,
                section: None,
                purpose: TemplatePurpose::Export(format),
            }],
            None => Vec::new(),
        },
        Msg::TemplateLoaded {
            file_id,
            purpose,
            result,
        } => {
            if !state.is_active_document(&file_id) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match purpose {
                TemplatePurpose::Preview => {
                    state.template = match result {
                        Ok(entries) => TemplatePanel::Ready(synthesize(&entries)),
                        Err(err) => TemplatePanel::Failed(err.message),
                    };
                    Vec::new()
                }
                TemplatePurpose::Export(format) => export_template(&mut state, format, result),
            }
        }
        Msg::ExportWritten(result) => {
            match result {
                Ok(path) => state.set_alert(StatusLine::new(
                    StatusKind::Success,
                    format!("Template exported to {}", path.display()),
                )),
                Err(err) => state.fail_action("Export", &err),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked { kind, scope } => submit_mutation(&mut state, kind, scope),
        Msg::MutationDone {
            file_id,
            kind,
            result,
        } => {
            if state.pending_mutation != Some(kind) || !state.is_active_document(&file_id) {
                return (state, Vec::new());
            }
            state.pending_mutation = None;
            let scope = state.pending_scope.take();
            match result {
                Ok(mut outcome) => {
                    if kind == MutationKind::ClearDefaults && scope == Some(ClearScope::All) {
                        outcome.message = CLEARED_ALL_MESSAGE.to_string();
                    }
                    state.complete_mutation(outcome);
                }
                Err(err) => state.fail_action(mutation_label(kind), &err),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::DownloadRequested { destination } => match (&state.phase, &state.result) {
            (Phase::ResultReady, Some(result)) => vec![Effect::Download {
                handle: result.download.clone(),
                destination,
            }],
            _ => Vec::new(),
        },
        Msg::DownloadSaved(result) => {
            match result {
                Ok(path) => state.set_alert(StatusLine::new(
                    StatusKind::Success,
                    format!("Saved {}", path.display()),
                )),
                Err(err) => state.fail_action("Download", &err),
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartOver => {
            state = Session::new();
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn request_upload(state: &mut Session, path: &Path) -> Vec<Effect> {
    if state.upload_pending {
        return Vec::new();
    }
    state.mark_dirty();
    if state.phase == Phase::ResultReady {
        state.set_alert(StatusLine::error(
            "Start over before uploading another document",
        ));
        return Vec::new();
    }
    if !has_upload_extension(path) {
        state.status = Some(StatusLine::error("Please upload a PDF file"));
        return Vec::new();
    }
    state.upload_pending = true;
    state.status = Some(StatusLine::new(StatusKind::Info, "Uploading PDF..."));
    vec![Effect::Upload {
        path: path.to_path_buf(),
    }]
}

fn has_upload_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(UPLOAD_EXTENSION))
}

fn submit_search(state: &mut Session, query: &str) -> Vec<Effect> {
    if query.is_empty() {
        return Vec::new();
    }
    let Some(file_id) = tools_file_id(state) else {
        return Vec::new();
    };
    state.search = SearchPanel::Searching {
        query: query.to_string(),
    };
    state.mark_dirty();
    vec![Effect::Search {
        file_id,
        query: query.to_string(),
    }]
}

fn export_template(
    state: &mut Session,
    format: ExportFormat,
    result: Result<Vec<TemplateEntry>, ActionError>,
) -> Vec<Effect> {
    match result {
        Ok(entries) => vec![Effect::WriteExport {
            filename: EXPORT_FILENAME.to_string(),
            contents: synthesize(&entries).artifact(format),
        }],
        Err(err) => {
            state.fail_action("Export", &err);
            Vec::new()
        }
    }
}

fn submit_mutation(state: &mut Session, kind: MutationKind, scope: ClearScope) -> Vec<Effect> {
    if state.pending_mutation.is_some() {
        return Vec::new();
    }
    let Some(file_id) = tools_file_id(state) else {
        return Vec::new();
    };
    if kind == MutationKind::Fill && !state.builder.can_submit() {
        return Vec::new();
    }
    let request = build_request(kind, scope, &state.builder);
    state.pending_mutation = Some(kind);
    state.pending_scope = Some(scope);
    state.alert = None;
    state.mark_dirty();
    vec![Effect::Mutate { file_id, request }]
}

fn tools_file_id(state: &Session) -> Option<String> {
    if state.tools_active() {
        state.active_file_id().map(ToOwned::to_owned)
    } else {
        None
    }
}

fn mutation_label(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Fill => "Filling PDF",
        MutationKind::RemoveVoid => "Removing VOID",
        MutationKind::ClearDefaults => "Clearing defaults",
    }
}
