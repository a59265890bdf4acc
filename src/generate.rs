//! generate / check / list commands.

use crate::config::Config;
use capy_launchers::{
    CachedIconResolver, DirectorySink, InstallState, RunReport, STATE_FILE, install,
    parse_desktop_entry, paths, prune,
};
use log::{error, info, warn};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Settings shared by all commands.
#[derive(Clone, Debug)]
pub struct Options {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub icon_cache_dir: PathBuf,
}

impl Options {
    pub fn new(config: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            config_path: config.unwrap_or_else(paths::default_config_path),
            output_dir: output.unwrap_or_else(paths::default_applications_dir),
            icon_cache_dir: paths::default_icon_cache_dir(),
        }
    }
}

fn resolve(options: &Options) -> Result<RunReport, Box<dyn Error>> {
    let config = Config::load(&options.config_path)?;
    info!(
        "Loaded {} web apps from {}",
        config.apps.len(),
        options.config_path.display()
    );

    let set = config.launcher_set(CachedIconResolver::new(&options.icon_cache_dir));
    let report = set.build(&config.apps).inspect_err(|e| error!("{e}"))?;
    Ok(report)
}

fn print_problems(report: &RunReport) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
}

/// Resolve, write and prune. Returns whether every app succeeded.
pub fn generate(options: &Options, dry_run: bool, strict: bool) -> Result<bool, Box<dyn Error>> {
    let report = resolve(options)?;
    print_problems(&report);

    if strict && report.has_failures() {
        error!(
            "{} apps failed, nothing written (strict mode)",
            report.failures.len()
        );
        return Ok(false);
    }

    if dry_run {
        for descriptor in report.descriptors.values() {
            println!("# {}", descriptor.file_name());
            println!("{}", descriptor.render());
        }
        return Ok(!report.has_failures());
    }

    let previous = InstallState::load(&options.output_dir);
    let mut sink = DirectorySink::new(&options.output_dir);
    let installed = install(report.descriptors.values(), &mut sink)?;
    let (written, unchanged) = sink.counts();

    let removed = prune(&options.output_dir, &previous, &installed)?;
    InstallState { files: installed }.save(&options.output_dir)?;

    info!(
        "{}: {} written, {} unchanged, {} removed",
        options.output_dir.display(),
        written,
        unchanged,
        removed.len()
    );
    Ok(!report.has_failures())
}

/// Resolve without writing anything.
pub fn check(options: &Options) -> Result<bool, Box<dyn Error>> {
    let report = resolve(options)?;
    print_problems(&report);
    println!(
        "{} ok, {} failed, {} icon warnings",
        report.descriptors.len(),
        report.failures.len(),
        report.warnings.len()
    );
    Ok(!report.has_failures())
}

/// Print the launchers installed by the last generate.
pub fn list(options: &Options) -> Result<(), Box<dyn Error>> {
    let state = InstallState::load(&options.output_dir);
    if state.files.is_empty() {
        info!(
            "No {} in {}, nothing installed yet",
            STATE_FILE,
            options.output_dir.display()
        );
        return Ok(());
    }

    for file in &state.files {
        let path = options.output_dir.join(file);
        match fs::read_to_string(&path)
            .ok()
            .as_deref()
            .and_then(parse_desktop_entry)
        {
            Some(entry) => println!("{}\t{}", entry.name, entry.exec),
            None => warn!("{} is missing or unreadable", path.display()),
        }
    }
    Ok(())
}
