use std::path::{Path, PathBuf};

use engine_logging::engine_info;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{FailureKind, RequestError};

/// Attachment name the backend gives a produced artifact.
pub fn download_filename(output_id: &str) -> String {
    format!("output_{output_id}.pdf")
}

/// Reads a document for upload, refusing files over `max_bytes`.
pub async fn read_upload(path: &Path, max_bytes: u64) -> Result<(String, Vec<u8>), RequestError> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RequestError::new(
                FailureKind::InvalidInput,
                format!("{} has no file name", path.display()),
            )
        })?;
    let meta = tokio::fs::metadata(path).await.map_err(io_error(path))?;
    if meta.len() > max_bytes {
        return Err(RequestError::new(
            FailureKind::InvalidInput,
            format!(
                "{} is {} bytes; the limit is {} bytes",
                filename,
                meta.len(),
                max_bytes
            ),
        ));
    }
    let bytes = tokio::fs::read(path).await.map_err(io_error(path))?;
    Ok((filename, bytes))
}

pub async fn read_import(path: &Path) -> Result<String, RequestError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(io_error(path))
}

pub fn write_export(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, RequestError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer
        .write(filename, contents.as_bytes())
        .map_err(persist_error)?;
    engine_info!("exported template to {:?}", path);
    Ok(path)
}

/// Saves a downloaded artifact.
///
/// Without a destination the artifact lands in `default_dir` under its
/// attachment name; a destination that is a directory gets the same name.
pub fn save_download(
    default_dir: &Path,
    destination: Option<&Path>,
    output_id: &str,
    bytes: &[u8],
) -> Result<PathBuf, RequestError> {
    let default_name = download_filename(output_id);
    let (dir, filename) = match destination {
        None => (default_dir.to_path_buf(), default_name),
        Some(path) if path.is_dir() => (path.to_path_buf(), default_name),
        Some(path) => {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(ToOwned::to_owned)
                .unwrap_or(default_name);
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (dir, filename)
        }
    };
    let path = AtomicFileWriter::new(dir)
        .write(&filename, bytes)
        .map_err(persist_error)?;
    engine_info!("saved artifact {} to {:?}", output_id, path);
    Ok(path)
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> RequestError + '_ {
    move |err| RequestError::new(FailureKind::Io, format!("{}: {}", path.display(), err))
}

fn persist_error(err: PersistError) -> RequestError {
    RequestError::new(FailureKind::Io, err.to_string())
}
