use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use engine_logging::{LogDestination, LogLevel, LogSettings};
use serde::{Deserialize, Serialize};
use workbench_engine::{BackendSettings, EngineSettings};

const DEFAULT_CONFIG_FILENAME: &str = "workbench.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub max_download_bytes: u64,
    pub export_dir: PathBuf,
    pub download_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        let engine = EngineSettings::default();
        Self {
            base_url: backend.base_url,
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            max_upload_bytes: backend.max_upload_bytes,
            max_download_bytes: backend.max_download_bytes,
            export_dir: engine.export_dir,
            download_dir: engine.download_dir,
            // The terminal belongs to the command shell.
            log_destination: LogDestination::File,
            log_level: LogLevel::Info,
            log_file: LogSettings::default().file,
        }
    }
}

impl AppConfig {
    pub(crate) fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            backend: BackendSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                max_upload_bytes: self.max_upload_bytes,
                max_download_bytes: self.max_download_bytes,
            },
            export_dir: self.export_dir.clone(),
            download_dir: self.download_dir.clone(),
        }
    }

    pub(crate) fn log_settings(&self) -> LogSettings {
        LogSettings {
            destination: self.log_destination,
            level: self.log_level,
            file: self.log_file.clone(),
        }
    }
}

/// Reads the config file and returns it with the path it came from.
///
/// An explicit path must exist. Without one, `./workbench.ron` is used when
/// present and built-in defaults otherwise. Runs before the logger exists,
/// so it does not log.
pub(crate) fn load_config(
    explicit: Option<&Path>,
) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !candidate.exists() {
                return Ok((AppConfig::default(), None));
            }
            candidate
        }
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok((config, Some(path)))
}

fn parse_config(content: &str) -> anyhow::Result<AppConfig> {
    Ok(ron::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(r#"(base_url: "http://backend:8080", log_level: Debug)"#).unwrap();
        assert_eq!(config.base_url, "http://backend:8080");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn engine_settings_carry_config_values() {
        let config = AppConfig {
            connect_timeout_secs: 3,
            download_dir: PathBuf::from("out"),
            ..AppConfig::default()
        };
        let settings = config.engine_settings();
        assert_eq!(settings.backend.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.download_dir, PathBuf::from("out"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.ron"))).is_err());
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workbench.ron");
        fs::write(&path, "(export_dir: \"exports\")").unwrap();
        let (config, source) = load_config(Some(&path)).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("exports"));
        assert_eq!(source, Some(path));
    }
}
