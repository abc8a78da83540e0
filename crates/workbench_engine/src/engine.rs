use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_info};
use workbench_core::{MutationRequest, TemplatePurpose};

use crate::client::{Backend, BackendSettings, ReqwestBackend};
use crate::files::{read_import, read_upload, save_download, write_export};
use crate::{EngineEvent, RequestError};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub backend: BackendSettings,
    pub export_dir: PathBuf,
    pub download_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            export_dir: PathBuf::from("."),
            download_dir: PathBuf::from("."),
        }
    }
}

/// Receives engine events on the engine's worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Upload { path: PathBuf },
    ListFields { file_id: String },
    Search { file_id: String, query: String },
    Template {
        file_id: String,
        section: Option<String>,
        purpose: TemplatePurpose,
    },
    Mutate {
        file_id: String,
        request: MutationRequest,
    },
    ReadImport { path: PathBuf },
    WriteExport { filename: String, contents: String },
    Download {
        output_id: String,
        destination: Option<PathBuf>,
    },
}

/// Front door of the background worker that talks to the backend.
///
/// Commands are executed on a tokio runtime owned by a dedicated thread and
/// every command ends in exactly one [`EngineEvent`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, RequestError> {
        let backend = Arc::new(ReqwestBackend::new(settings.backend.clone())?);
        Ok(Self::with_backend(backend, settings, sink))
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let settings = Arc::new(settings);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("engine runtime failed to start: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let settings = settings.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(backend.as_ref(), &settings, command).await;
                    sink.emit(event);
                });
            }
            engine_info!("engine command channel closed");
        });

        Self { cmd_tx }
    }

    pub fn upload(&self, path: PathBuf) {
        self.send(EngineCommand::Upload { path });
    }

    pub fn list_fields(&self, file_id: impl Into<String>) {
        self.send(EngineCommand::ListFields {
            file_id: file_id.into(),
        });
    }

    pub fn search(&self, file_id: impl Into<String>, query: impl Into<String>) {
        self.send(EngineCommand::Search {
            file_id: file_id.into(),
            query: query.into(),
        });
    }

    pub fn template(
        &self,
        file_id: impl Into<String>,
        section: Option<String>,
        purpose: TemplatePurpose,
    ) {
        self.send(EngineCommand::Template {
            file_id: file_id.into(),
            section,
            purpose,
        });
    }

    pub fn mutate(&self, file_id: impl Into<String>, request: MutationRequest) {
        self.send(EngineCommand::Mutate {
            file_id: file_id.into(),
            request,
        });
    }

    pub fn read_import(&self, path: PathBuf) {
        self.send(EngineCommand::ReadImport { path });
    }

    pub fn write_export(&self, filename: impl Into<String>, contents: String) {
        self.send(EngineCommand::WriteExport {
            filename: filename.into(),
            contents,
        });
    }

    pub fn download(&self, output_id: impl Into<String>, destination: Option<PathBuf>) {
        self.send(EngineCommand::Download {
            output_id: output_id.into(),
            destination,
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: &dyn Backend,
    settings: &EngineSettings,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Upload { path } => {
            let result = match read_upload(&path, settings.backend.max_upload_bytes).await {
                Ok((filename, bytes)) => backend.upload(&filename, bytes).await,
                Err(err) => Err(err),
            };
            EngineEvent::Uploaded(result)
        }
        EngineCommand::ListFields { file_id } => {
            let result = backend.list_fields(&file_id).await;
            EngineEvent::FieldsListed { file_id, result }
        }
        EngineCommand::Search { file_id, query } => {
            let result = backend.search(&file_id, &query).await;
            EngineEvent::SearchFinished {
                file_id,
                query,
                result,
            }
        }
        EngineCommand::Template {
            file_id,
            section,
            purpose,
        } => {
            let result = backend.template(&file_id, section.as_deref()).await;
            EngineEvent::TemplateFetched {
                file_id,
                purpose,
                result,
            }
        }
        EngineCommand::Mutate { file_id, request } => {
            let result = backend.mutate(&file_id, &request).await;
            EngineEvent::MutationFinished {
                file_id,
                kind: request.kind(),
                result,
            }
        }
        EngineCommand::ReadImport { path } => EngineEvent::ImportRead(read_import(&path).await),
        EngineCommand::WriteExport { filename, contents } => EngineEvent::ExportWritten(
            write_export(&settings.export_dir, &filename, &contents),
        ),
        EngineCommand::Download {
            output_id,
            destination,
        } => {
            let result = match backend.download(&output_id).await {
                Ok(bytes) => save_download(
                    &settings.download_dir,
                    destination.as_deref(),
                    &output_id,
                    &bytes,
                ),
                Err(err) => Err(err),
            };
            EngineEvent::DownloadSaved(result)
        }
    }
}
