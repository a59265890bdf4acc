//! Web app declarations as handed over by the config loader.

use serde::{Deserialize, Serialize};

/// A single declared web app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebApp {
    /// Unique name, also used as the descriptor file name.
    pub name: String,
    /// Absolute http(s) URL the launcher opens.
    pub url: String,
    /// Icon URL or local path. Defaults to `<origin>/favicon.ico`.
    pub icon: Option<String>,
    /// Expected sha256 (hex) of a downloaded icon.
    pub icon_sha256: Option<String>,
    /// Browser id, overrides the global default.
    pub browser: Option<String>,
    /// Literal command line, bypasses browser and PWA handling.
    pub exec: Option<String>,
    pub comment: Option<String>,
    /// Protocol handler MIME types, in declaration order.
    #[serde(default)]
    pub mime_types: Vec<String>,
    pub pwa: Option<PwaOptions>,
    /// Known firefoxpwa site id, skips the site lookup.
    pub firefox_pwa_id: Option<String>,
}

/// Progressive web app launching options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PwaOptions {
    #[serde(default)]
    pub enabled: bool,
    /// Defaults to `<url>/manifest.json`.
    pub manifest_url: Option<String>,
    pub profile: Option<String>,
}

impl WebApp {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Literal exec override, empty strings count as unset.
    pub fn exec_override(&self) -> Option<&str> {
        self.exec.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// PWA options if PWA launching is switched on.
    pub fn enabled_pwa(&self) -> Option<&PwaOptions> {
        self.pwa.as_ref().filter(|p| p.enabled)
    }

    /// Per-app browser override, blank strings count as unset.
    pub fn browser_override(&self) -> Option<&str> {
        self.browser.as_deref().filter(|b| !b.trim().is_empty())
    }

    /// Comment line, falling back to the app name.
    pub fn comment_or_name(&self) -> &str {
        match self.comment.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => &self.name,
        }
    }
}
