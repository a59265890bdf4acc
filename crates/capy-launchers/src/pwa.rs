//! PWA runtime invocation.
//!
//! Site lookup, installation and launching belong to the runtime; we only
//! produce the command line that asks it to do so.

/// Produces the command line that launches a manifest through a PWA runtime.
pub trait PwaRuntime: Send + Sync {
    fn launch_command(&self, manifest_url: &str, profile: Option<&str>, site_id: Option<&str>) -> String;
}

/// firefoxpwa style runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirefoxPwa {
    program: String,
}

impl FirefoxPwa {
    pub const DEFAULT_PROGRAM: &'static str = "firefoxpwa";

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for FirefoxPwa {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl PwaRuntime for FirefoxPwa {
    fn launch_command(&self, manifest_url: &str, profile: Option<&str>, site_id: Option<&str>) -> String {
        if let Some(id) = site_id.filter(|id| !id.is_empty()) {
            return format!("{} site launch {}", self.program, id);
        }

        let mut command = format!("{} site launch --manifest \"{}\"", self.program, manifest_url);
        if let Some(profile) = profile.filter(|p| !p.is_empty()) {
            command.push_str(&format!(" --profile \"{profile}\""));
        }
        command
    }
}

/// Manifest location used when the app does not name one.
pub fn default_manifest_url(url: &str) -> String {
    format!("{}/manifest.json", url.trim_end_matches('/'))
}
