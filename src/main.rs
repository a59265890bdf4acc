//! capy-webapps - declarative web app launchers
//!
//! Reads a list of web apps and installs a `.desktop` launcher for each of them.

mod config;
mod generate;
mod watch;

use clap::{Parser, Subcommand};
use generate::Options;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
/// Generate desktop launchers for web apps
struct Cli {
    /// Web app config file [default: ~/.config/capy-webapps/webapps.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Launcher directory [default: ~/.local/share/applications]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Clone, Debug)]
enum Action {
    /// Write launchers and remove the ones no longer configured
    Generate {
        /// Print the launchers instead of writing them
        #[arg(long)]
        dry_run: bool,
        /// Write nothing if any app fails
        #[arg(long)]
        strict: bool,
    },
    /// Resolve every app and report problems without writing
    Check,
    /// List installed launchers
    List,
    /// Regenerate whenever the config changes
    Watch,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = Options::new(cli.config, cli.output);

    let clean = match cli.action {
        Action::Generate { dry_run, strict } => generate::generate(&options, dry_run, strict)?,
        Action::Check => generate::check(&options)?,
        Action::List => {
            generate::list(&options)?;
            true
        }
        Action::Watch => {
            watch::watch(&options)?;
            true
        }
    };

    if !clean {
        std::process::exit(1);
    }
    Ok(())
}
