//! Launch command derivation.
//!
//! Precedence: `exec` > pwa > per-app browser > global browser > error.

use crate::app::WebApp;
use crate::browser::BrowserRegistry;
use crate::error::LauncherError;
use crate::pwa::{PwaRuntime, default_manifest_url};
use crate::url::window_class;
use log::debug;

/// Everything outside the app itself that command derivation depends on.
pub struct LaunchContext<'a> {
    pub registry: &'a BrowserRegistry,
    /// Global fallback browser id.
    pub default_browser: Option<&'a str>,
    pub pwa_runtime: &'a dyn PwaRuntime,
}

/// Build the command line that launches `app`.
///
/// The result always fits on a single `Exec=` line.
pub fn build_launch_command(app: &WebApp, ctx: &LaunchContext<'_>) -> Result<String, LauncherError> {
    let exec = derive_command(app, ctx)?;
    if exec.contains(['\n', '\r']) {
        return Err(LauncherError::InvalidExec {
            app: app.name.clone(),
            exec,
        });
    }
    Ok(exec)
}

fn derive_command(app: &WebApp, ctx: &LaunchContext<'_>) -> Result<String, LauncherError> {
    if let Some(exec) = app.exec_override() {
        debug!("{}: using literal exec", app.name);
        return Ok(exec.to_string());
    }

    if let Some(pwa) = app.enabled_pwa() {
        let manifest_url = pwa
            .manifest_url
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_manifest_url(&app.url));
        debug!("{}: launching through PWA runtime ({})", app.name, manifest_url);
        return Ok(ctx.pwa_runtime.launch_command(
            &manifest_url,
            pwa.profile.as_deref(),
            app.firefox_pwa_id.as_deref(),
        ));
    }

    let browser_id = app
        .browser_override()
        .or(ctx.default_browser.filter(|b| !b.trim().is_empty()))
        .ok_or_else(|| LauncherError::MissingBrowser {
            app: app.name.clone(),
        })?;

    let browser = ctx
        .registry
        .lookup(browser_id)
        .ok_or_else(|| LauncherError::UnsupportedBrowser {
            app: app.name.clone(),
            browser: browser_id.to_string(),
        })?;

    debug!("{}: {} ({:?})", app.name, browser.id, browser.engine);
    Ok(browser
        .engine
        .launch_command(&browser.executable, &window_class(&app.url), &app.url))
}
