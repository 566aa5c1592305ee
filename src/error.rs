use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the harness.
/// Failed runs are not errors unless the failure policy says so,
/// they end up as records with `success == false`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    #[error("failed to launch {program:?}: {source}")]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("build `{command}` failed: {status}")]
    BuildFailed { command: String, status: String },

    #[error("run {run} failed: {status}")]
    RunFailed { run: String, status: String },

    #[error("table {path:?}: {source}")]
    Table { path: PathBuf, source: csv::Error },

    #[error("images {first} and {second} would write the same charts")]
    ChartCollision { first: String, second: String },

    #[error("chart {path:?}: {source}")]
    Chart {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Human readable process status for logs and error messages.
pub fn status_label(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(0) => "ok".to_string(),
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}
