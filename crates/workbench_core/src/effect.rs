use std::path::PathBuf;

use crate::{DownloadHandle, MutationRequest, TemplatePurpose};

/// Name of the exported template artifact.
pub const EXPORT_FILENAME: &str = "template.json";

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upload { path: PathBuf },
    ListFields { file_id: String },
    Search { file_id: String, query: String },
    FetchTemplate {
        file_id: String,
        section: Option<String>,
        purpose: TemplatePurpose,
    },
    ReadImport { path: PathBuf },
    WriteExport { filename: String, contents: String },
    Mutate { file_id: String, request: MutationRequest },
    Download {
        handle: DownloadHandle,
        destination: Option<PathBuf>,
    },
}
