//! Browser registry: which engine each browser runs and how to start it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rendering engine family, decides the app-window flag syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineFamily {
    Chromium,
    Firefox,
}

impl EngineFamily {
    /// Command line opening `url` in its own window grouped under `app_class`.
    pub fn launch_command(&self, executable: &str, app_class: &str, url: &str) -> String {
        match self {
            EngineFamily::Chromium => {
                format!("{executable} --new-window --class=\"{app_class}\" --app=\"{url}\"")
            }
            EngineFamily::Firefox => {
                format!("{executable} --new-window --class \"{app_class}\" \"{url}\"")
            }
        }
    }
}

/// A known browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BrowserDescriptor {
    /// Identifier used in configs, e.g. "brave".
    pub id: String,
    pub engine: EngineFamily,
    /// Program name or path put in front of the command line.
    pub executable: String,
}

impl BrowserDescriptor {
    pub fn new(id: impl Into<String>, engine: EngineFamily, executable: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            engine,
            executable: executable.into(),
        }
    }
}

const BUILTIN_BROWSERS: &[(&str, EngineFamily, &str)] = &[
    ("chromium", EngineFamily::Chromium, "chromium"),
    ("ungoogled-chromium", EngineFamily::Chromium, "chromium"),
    ("google-chrome", EngineFamily::Chromium, "google-chrome-stable"),
    ("google-chrome-stable", EngineFamily::Chromium, "google-chrome-stable"),
    ("brave", EngineFamily::Chromium, "brave"),
    ("vivaldi", EngineFamily::Chromium, "vivaldi"),
    ("microsoft-edge", EngineFamily::Chromium, "microsoft-edge"),
    ("thorium", EngineFamily::Chromium, "thorium-browser"),
    ("firefox", EngineFamily::Firefox, "firefox"),
    ("firefox-esr", EngineFamily::Firefox, "firefox-esr"),
    ("librewolf", EngineFamily::Firefox, "librewolf"),
    ("floorp", EngineFamily::Firefox, "floorp"),
    ("waterfox", EngineFamily::Firefox, "waterfox"),
    ("zen", EngineFamily::Firefox, "zen"),
];

/// Lookup table from browser id to its descriptor.
#[derive(Clone, Debug)]
pub struct BrowserRegistry {
    browsers: HashMap<String, BrowserDescriptor>,
}

impl BrowserRegistry {
    /// Registry without any browsers.
    pub fn empty() -> Self {
        Self {
            browsers: HashMap::new(),
        }
    }

    /// Registry holding the builtin browser table.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (id, engine, executable) in BUILTIN_BROWSERS {
            registry.register(BrowserDescriptor::new(*id, *engine, *executable));
        }
        registry
    }

    /// Add a browser, replacing (and returning) any entry with the same id.
    pub fn register(&mut self, browser: BrowserDescriptor) -> Option<BrowserDescriptor> {
        self.browsers.insert(browser.id.clone(), browser)
    }

    /// Builtin table extended with user supplied entries.
    pub fn with_extra(extra: impl IntoIterator<Item = BrowserDescriptor>) -> Self {
        let mut registry = Self::builtin();
        for browser in extra {
            if let Some(old) = registry.register(browser) {
                log::debug!("Browser {:?} overridden by config", old.id);
            }
        }
        registry
    }

    pub fn lookup(&self, id: &str) -> Option<&BrowserDescriptor> {
        self.browsers.get(id)
    }

    /// Engine family of a browser, `None` for unknown ids.
    pub fn classify(&self, id: &str) -> Option<EngineFamily> {
        self.lookup(id).map(|b| b.engine)
    }

    /// All known ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.browsers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for BrowserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
