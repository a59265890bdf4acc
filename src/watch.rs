//! Regenerate launchers whenever the config file changes.

use crate::generate::{Options, generate};
use log::{debug, error, info, warn};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::error::Error;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

/// Editors tend to write a file in several steps; wait for the burst to settle.
const DEBOUNCE: Duration = Duration::from_millis(300);

fn touches_config(event: &Event, config_path: &Path) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == config_path.file_name())
}

fn regenerate(options: &Options) {
    match generate(options, false, false) {
        Ok(true) => info!("Launchers regenerated"),
        Ok(false) => warn!("Launchers regenerated with errors"),
        Err(e) => error!("Regeneration failed: {e}"),
    }
}

/// Generate once, then again on every config change. Runs until the watcher dies.
pub fn watch(options: &Options) -> Result<(), Box<dyn Error>> {
    regenerate(options);

    // Watch the directory, editors often replace the file instead of writing to it.
    let dir = match options.config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("Watching {} for changes", options.config_path.display());

    while let Ok(result) = rx.recv() {
        match result {
            Ok(event) if touches_config(&event, &options.config_path) => {
                debug!("Config event: {:?}", event.kind);
                std::thread::sleep(DEBOUNCE);
                while rx.try_recv().is_ok() {}
                regenerate(options);
            }
            Ok(_) => {}
            Err(e) => warn!("Watch error: {e}"),
        }
    }

    Ok(())
}
