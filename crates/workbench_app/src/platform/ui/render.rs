use std::fmt::Write;

use workbench_core::{
    ControlState, EntryValue, FieldRowView, Phase, SearchView, SessionView, StatusKind,
    StatusLine,
};

/// Field rows printed before the list is cut short.
const MAX_FIELD_ROWS: usize = 40;

/// Renders the whole session as plain text.
pub fn render(view: &SessionView) -> String {
    let mut out = String::new();
    render_header(&mut out, view);
    if view.phase != Phase::NoDocument {
        render_fields(&mut out, view);
        render_search(&mut out, &view.search);
        if let Some(template) = &view.template_output {
            let _ = writeln!(out, "\nTemplate:\n{template}");
        }
        render_entries(&mut out, view);
        render_controls(&mut out, view);
    }
    if let Some(result) = &view.result {
        let _ = writeln!(
            out,
            "\nResult: {}\n  download: {}",
            result.message, result.download_path
        );
    }
    if let Some(alert) = &view.alert {
        let _ = writeln!(out, "\n{}", status_text(alert));
    }
    out
}

fn render_header(out: &mut String, view: &SessionView) {
    let document = view.filename.as_deref().unwrap_or("(no document)");
    let phase = match view.phase {
        Phase::NoDocument => "no document",
        Phase::DocumentLoaded => "editing",
        Phase::ResultReady => "result ready",
    };
    let _ = writeln!(out, "== {document} [{phase}]");
    if view.upload_busy {
        let _ = writeln!(out, "Uploading...");
    }
    if let Some(status) = &view.status {
        let _ = writeln!(out, "{}", status_text(status));
    }
}

fn render_fields(out: &mut String, view: &SessionView) {
    let _ = writeln!(out, "\n{}", view.field_stats);
    if !view.filter.text.is_empty() || !view.filter.section.is_empty() {
        let _ = writeln!(
            out,
            "  filter={:?} section={:?}",
            view.filter.text, view.filter.section
        );
    }
    for row in view.fields.iter().take(MAX_FIELD_ROWS) {
        let _ = writeln!(out, "  {}", field_row(row));
    }
    if view.fields.len() > MAX_FIELD_ROWS {
        let _ = writeln!(out, "  ... {} more", view.fields.len() - MAX_FIELD_ROWS);
    }
}

fn render_search(out: &mut String, search: &SearchView) {
    match search {
        SearchView::Idle => {}
        SearchView::Searching => {
            let _ = writeln!(out, "\nSearching...");
        }
        SearchView::NoMatches => {
            let _ = writeln!(out, "\nNo fields found matching your search.");
        }
        SearchView::Results(rows) => {
            let _ = writeln!(out, "\nSearch results:");
            for (position, row) in rows.iter().enumerate() {
                let _ = writeln!(out, "  {:>2}. {}", position + 1, field_row(row));
            }
        }
        // Transport failures arrive already prefixed.
        SearchView::Failed(message) => {
            let _ = writeln!(out, "\n{message}");
        }
    }
}

fn render_entries(out: &mut String, view: &SessionView) {
    if view.entries.is_empty() {
        let _ = writeln!(out, "\nForm: (empty)");
        return;
    }
    let _ = writeln!(out, "\nForm:");
    for entry in &view.entries {
        let value = match &entry.value {
            EntryValue::Text(text) => format!("{text:?}"),
            EntryValue::Checked(true) => "[x]".to_string(),
            EntryValue::Checked(false) => "[ ]".to_string(),
        };
        let name = if entry.name.is_empty() {
            "(unnamed)"
        } else {
            entry.name.as_str()
        };
        let _ = writeln!(
            out,
            "  #{} {} ({}) = {}",
            entry.id.0, name, entry.field_type, value
        );
    }
}

fn render_controls(out: &mut String, view: &SessionView) {
    let _ = writeln!(
        out,
        "\nfill: {}  remove-void: {}  clear-defaults: {}",
        control_text(view.fill_control),
        control_text(view.remove_void_control),
        control_text(view.clear_defaults_control)
    );
}

fn field_row(row: &FieldRowView) -> String {
    match &row.tooltip {
        Some(tooltip) => format!("{} ({}) - {}", row.name, row.field_type, tooltip),
        None => format!("{} ({})", row.name, row.field_type),
    }
}

fn status_text(status: &StatusLine) -> String {
    let marker = match status.kind {
        StatusKind::Info => "..",
        StatusKind::Success => "ok",
        StatusKind::Error => "!!",
    };
    format!("[{marker}] {}", status.message)
}

fn control_text(state: ControlState) -> &'static str {
    match state {
        ControlState::Ready => "ready",
        ControlState::Disabled => "disabled",
        ControlState::Busy => "busy",
    }
}
