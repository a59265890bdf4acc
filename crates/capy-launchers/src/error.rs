//! Error types for capy-launchers

use std::path::PathBuf;

/// Reasons a web app cannot be turned into a launcher.
///
/// `DuplicateAppName` and `EmptyAppName` are structural and abort the whole run,
/// everything else only drops the app that caused it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LauncherError {
    #[error("{app}: url {url:?} is not an absolute http(s) URL")]
    InvalidUrl { app: String, url: String },

    #[error("{app}: no exec, no pwa and no browser set (configure `browser` on the app or globally)")]
    MissingBrowser { app: String },

    #[error("{app}: launch command {exec:?} contains a line break")]
    InvalidExec { app: String, exec: String },

    #[error("{app}: unsupported browser {browser:?}")]
    UnsupportedBrowser { app: String, browser: String },

    #[error("duplicate app name {name:?}")]
    DuplicateAppName { name: String },

    #[error("app with empty name (url {url:?})")]
    EmptyAppName { url: String },
}

impl LauncherError {
    /// Name of the app the error belongs to.
    pub fn app(&self) -> &str {
        match self {
            LauncherError::InvalidUrl { app, .. }
            | LauncherError::MissingBrowser { app }
            | LauncherError::InvalidExec { app, .. }
            | LauncherError::UnsupportedBrowser { app, .. } => app,
            LauncherError::DuplicateAppName { name } => name,
            LauncherError::EmptyAppName { .. } => "",
        }
    }
}

/// Icon resolution errors
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("icon file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("download failed: {0}")]
    Download(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while writing descriptors to disk
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Io {
            path: path.into(),
            source,
        }
    }
}
