use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use workbench_core::{ClearScope, EntryId, ExportFormat, FieldType, MutationKind, Msg};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  upload <path>              upload a PDF document
  filter [text]              filter the field list by name or tooltip
  section [prefix]           restrict the field list to a section
  search <query>             ask the backend for matching fields
  add [name] [type]          add an entry (type: text or checkbox)
  add-field <name>           add a field from the field list
  add-result <n>             add the n-th search result
  remove <id>                remove an entry
  rename <id> <name>         rename an entry
  set <id> <value>           set the text of an entry
  check <id> | uncheck <id>  toggle a checkbox entry
  clear                      remove every entry
  import <path>              load entries from a JSON object file
  template [section]         preview the fill template
  export [annotated|canonical]
                             write the template to template.json
  fill                       fill the document with the form entries
  remove-void                remove VOID markings
  clear-defaults [all]       clear default values (form fields, or all)
  download [path]            save the produced document
  start-over                 forget the document and start again
  show | help | quit";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb {
        "show" => return Ok(Some(Command::Show)),
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "upload" => Msg::UploadRequested {
            path: required_path(rest, "upload <path>")?,
        },
        "filter" => Msg::FilterTextChanged(rest.to_string()),
        "section" => Msg::SectionChanged(rest.to_string()),
        "search" => Msg::SearchSubmitted(rest.to_string()),
        "add" => {
            let mut words = rest.split_whitespace();
            let name = words.next().unwrap_or_default().to_string();
            let field_type = words.next().map(FieldType::from).unwrap_or(FieldType::Text);
            Msg::AddEntry {
                name,
                field_type,
                value: String::new(),
            }
        }
        "add-field" => {
            if rest.is_empty() {
                bail!("usage: add-field <name>");
            }
            Msg::AddFromRegistry {
                name: rest.to_string(),
            }
        }
        "add-result" => {
            let position: usize = rest
                .parse()
                .with_context(|| format!("not a result number: {rest:?}"))?;
            let index = position
                .checked_sub(1)
                .ok_or_else(|| anyhow!("result numbers start at 1"))?;
            Msg::AddFromSearch { index }
        }
        "remove" => Msg::RemoveEntry(entry_id(rest)?),
        "rename" => {
            let (id, name) = id_and_rest(rest, "rename <id> <name>")?;
            Msg::RenameEntry { id, name }
        }
        "set" => {
            let (id, text) = id_and_rest(rest, "set <id> <value>")?;
            Msg::EntryTextChanged { id, text }
        }
        "check" => Msg::EntryCheckedChanged {
            id: entry_id(rest)?,
            checked: true,
        },
        "uncheck" => Msg::EntryCheckedChanged {
            id: entry_id(rest)?,
            checked: false,
        },
        "clear" => Msg::ClearForm,
        "import" => Msg::ImportRequested {
            path: required_path(rest, "import <path>")?,
        },
        "template" => Msg::TemplateRequested {
            section: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "export" => Msg::ExportRequested(match rest {
            "" | "annotated" => ExportFormat::Annotated,
            "canonical" => ExportFormat::Canonical,
            other => bail!("unknown export format {other:?}"),
        }),
        "fill" => submit(MutationKind::Fill, ClearScope::FormFields),
        "remove-void" => submit(MutationKind::RemoveVoid, ClearScope::FormFields),
        "clear-defaults" => match rest {
            "" => submit(MutationKind::ClearDefaults, ClearScope::FormFields),
            "all" => submit(MutationKind::ClearDefaults, ClearScope::All),
            other => bail!("unknown clear-defaults scope {other:?}"),
        },
        "download" => Msg::DownloadRequested {
            destination: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        },
        "start-over" => Msg::StartOver,
        other => bail!("unknown command {other:?}; type `help`"),
    };
    Ok(Some(Command::Dispatch(msg)))
}

fn submit(kind: MutationKind, scope: ClearScope) -> Msg {
    Msg::SubmitClicked { kind, scope }
}

fn required_path(rest: &str, usage: &str) -> anyhow::Result<PathBuf> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(PathBuf::from(rest))
}

fn entry_id(word: &str) -> anyhow::Result<EntryId> {
    let digits = word.strip_prefix('#').unwrap_or(word);
    let id = digits
        .parse()
        .with_context(|| format!("not an entry id: {word:?}"))?;
    Ok(EntryId(id))
}

fn id_and_rest(rest: &str, usage: &str) -> anyhow::Result<(EntryId, String)> {
    match rest.split_once(char::is_whitespace) {
        Some((id, value)) => Ok((entry_id(id)?, value.trim().to_string())),
        None if !rest.is_empty() => Ok((entry_id(rest)?, String::new())),
        None => bail!("usage: {usage}"),
    }
}
