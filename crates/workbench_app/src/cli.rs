use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use engine_logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "workbench",
    version,
    about = "Inspect and fill document form fields through a processing backend"
)]
pub struct Cli {
    /// RON config file (defaults to ./workbench.ron when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Backend base url, overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, value_enum)]
    pub log_level: Option<LevelArg>,
    /// Document to upload at startup
    pub document: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LevelArg> for LogLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Error => LogLevel::Error,
            LevelArg::Warn => LogLevel::Warn,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Trace => LogLevel::Trace,
        }
    }
}
