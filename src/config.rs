//! Web app configuration file.

use capy_launchers::{BrowserDescriptor, BrowserRegistry, FirefoxPwa, IconResolver, LauncherSet, WebApp};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of `webapps.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Browser used by apps that don't pick one.
    pub browser: Option<String>,
    /// Extra browsers, merged over the builtin table.
    #[serde(default)]
    pub browsers: Vec<BrowserDescriptor>,
    /// Program handling PWA launches.
    pub pwa_helper: Option<String>,
    #[serde(default)]
    pub apps: Vec<WebApp>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Launcher set configured from this file.
    pub fn launcher_set(&self, icons: impl IconResolver + 'static) -> LauncherSet {
        let runtime = match self.pwa_helper.as_deref().filter(|p| !p.is_empty()) {
            Some(program) => FirefoxPwa::new(program),
            None => FirefoxPwa::default(),
        };

        LauncherSet::new(icons)
            .with_registry(BrowserRegistry::with_extra(self.browsers.iter().cloned()))
            .with_default_browser(self.browser.clone())
            .with_pwa_runtime(runtime)
    }
}
