//! capy-launchers: declarative web app launchers for Linux desktops.
//!
//! Given a list of web app declarations this crate derives, per app:
//! - the command line opening the URL in an app-mode browser window (or a PWA runtime)
//! - a window class so the window manager groups the app's windows
//! - an icon, resolved to a local file
//!
//! and renders everything as `.desktop` launcher entries.

mod app;
mod browser;
mod command;
mod desktop_entry;
mod error;
mod icons;
mod install;
mod launcher_set;
pub mod paths;
mod pwa;
pub mod url;

pub use app::{PwaOptions, WebApp};
pub use browser::{BrowserDescriptor, BrowserRegistry, EngineFamily};
pub use command::{LaunchContext, build_launch_command};
pub use desktop_entry::{LaunchDescriptor, ParsedEntry, parse_desktop_entry};
pub use error::{IconError, InstallError, LauncherError};
pub use icons::{CachedIconResolver, IconReference, IconResolver};
pub use install::{DescriptorSink, DirectorySink, InstallState, STATE_FILE, install, prune};
pub use launcher_set::{IconWarning, LauncherSet, RunReport};
pub use pwa::{FirefoxPwa, PwaRuntime, default_manifest_url};
