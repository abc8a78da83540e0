//! Workbench engine: backend client and effect execution.
mod client;
mod engine;
mod files;
mod persist;
mod types;
mod wire;

pub use client::{Backend, BackendSettings, ReqwestBackend};
pub use engine::{ChannelEventSink, EngineHandle, EngineSettings, EventSink};
pub use files::{download_filename, read_import, read_upload, save_download, write_export};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{EngineEvent, FailureKind, RequestError};
