//! Writing descriptors to an applications directory and pruning stale ones.

use crate::desktop_entry::LaunchDescriptor;
use crate::error::InstallError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the file recording which descriptors we installed.
pub const STATE_FILE: &str = ".capy-webapps.json";

/// Destination for rendered descriptors.
pub trait DescriptorSink {
    /// Store `content` under `relative_name`.
    fn write(&mut self, relative_name: &str, content: &str) -> Result<(), InstallError>;
}

/// Sink writing into a directory, e.g. `~/.local/share/applications`.
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
    unchanged: usize,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
            unchanged: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// (files written, files left alone because they were already up to date)
    pub fn counts(&self) -> (usize, usize) {
        (self.written, self.unchanged)
    }
}

impl DescriptorSink for DirectorySink {
    fn write(&mut self, relative_name: &str, content: &str) -> Result<(), InstallError> {
        let path = self.dir.join(relative_name);

        if fs::read_to_string(&path).is_ok_and(|existing| existing == content) {
            debug!("{} is up to date", path.display());
            self.unchanged += 1;
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|e| InstallError::io(&self.dir, e))?;
        let partial = path.with_extension("desktop.part");
        fs::write(&partial, content).map_err(|e| InstallError::io(&partial, e))?;
        fs::rename(&partial, &path).map_err(|e| InstallError::io(&path, e))?;

        debug!("Wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}

/// Write every descriptor to `sink`. Returns the installed file names.
pub fn install<'a>(
    descriptors: impl IntoIterator<Item = &'a LaunchDescriptor>,
    sink: &mut dyn DescriptorSink,
) -> Result<BTreeSet<String>, InstallError> {
    let mut names = BTreeSet::new();
    for descriptor in descriptors {
        let file_name = descriptor.file_name();
        sink.write(&file_name, &descriptor.render())?;
        names.insert(file_name);
    }
    Ok(names)
}

/// Descriptors installed by a previous run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallState {
    pub files: BTreeSet<String>,
}

impl InstallState {
    /// Load from `dir`, or return an empty state if there is none yet.
    pub fn load(dir: &Path) -> Self {
        fs::read_to_string(dir.join(STATE_FILE))
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, dir: &Path) -> Result<(), InstallError> {
        fs::create_dir_all(dir).map_err(|e| InstallError::io(dir, e))?;
        let path = dir.join(STATE_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| InstallError::io(&path, e))
    }
}

/// Remove descriptors from `previous` that are not in `current`.
///
/// Only files recorded in the state are ever removed. Returns the removed names.
pub fn prune(
    dir: &Path,
    previous: &InstallState,
    current: &BTreeSet<String>,
) -> Result<Vec<String>, InstallError> {
    let mut removed = Vec::new();
    for stale in previous.files.difference(current) {
        // Never follow names out of the directory.
        if stale.contains('/') || !stale.ends_with(".desktop") {
            continue;
        }

        let path = dir.join(stale);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed stale launcher {}", path.display());
                removed.push(stale.clone());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(InstallError::io(path, e)),
        }
    }
    Ok(removed)
}
