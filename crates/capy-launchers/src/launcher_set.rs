//! Turns a list of web apps into launch descriptors.

use crate::app::WebApp;
use crate::browser::BrowserRegistry;
use crate::command::{LaunchContext, build_launch_command};
use crate::desktop_entry::{LaunchDescriptor, desktop_file_name};
use crate::error::{IconError, LauncherError};
use crate::icons::{IconReference, IconResolver};
use crate::pwa::{FirefoxPwa, PwaRuntime};
use crate::url::is_absolute_http_url;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Upper bound on apps resolved at the same time.
const MAX_WORKERS: usize = 8;

/// Icon resolution failure for one app. The app still gets a descriptor, without `Icon=`.
#[derive(Debug)]
pub struct IconWarning {
    pub app: String,
    pub reference: String,
    pub error: IconError,
}

impl fmt::Display for IconWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: icon resolution failed for {}: {}",
            self.app, self.reference, self.error
        )
    }
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Descriptors of every app that could be resolved, keyed by app name.
    pub descriptors: BTreeMap<String, LaunchDescriptor>,
    /// Per-app failures, sorted by app name.
    pub failures: Vec<LauncherError>,
    /// Icon warnings, sorted by app name.
    pub warnings: Vec<IconWarning>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Orchestrates launcher resolution for a whole app list.
pub struct LauncherSet {
    registry: BrowserRegistry,
    default_browser: Option<String>,
    icons: Arc<dyn IconResolver>,
    pwa_runtime: Arc<dyn PwaRuntime>,
}

impl LauncherSet {
    /// Builtin browsers, no default browser, firefoxpwa runtime.
    pub fn new(icons: impl IconResolver + 'static) -> Self {
        Self {
            registry: BrowserRegistry::builtin(),
            default_browser: None,
            icons: Arc::new(icons),
            pwa_runtime: Arc::new(FirefoxPwa::default()),
        }
    }

    pub fn with_registry(mut self, registry: BrowserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_default_browser(mut self, browser: Option<String>) -> Self {
        self.default_browser = browser;
        self
    }

    pub fn with_pwa_runtime(mut self, runtime: impl PwaRuntime + 'static) -> Self {
        self.pwa_runtime = Arc::new(runtime);
        self
    }

    /// Resolve every app.
    ///
    /// Fails as a whole only on structural problems (empty or duplicate names),
    /// before any app is processed. Per-app problems end up in the report.
    pub fn build(&self, apps: &[WebApp]) -> Result<RunReport, LauncherError> {
        check_names(apps)?;
        info!("Resolving {} web apps", apps.len());

        // Workers pull apps off a shared index, at most MAX_WORKERS at a time.
        let workers = apps.len().clamp(1, MAX_WORKERS);
        let next = AtomicUsize::new(0);
        let outcomes: Vec<AppOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut done = Vec::new();
                        while let Some(app) = apps.get(next.fetch_add(1, Ordering::Relaxed)) {
                            done.push(self.process(app));
                        }
                        done
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(done) => done,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut report = RunReport::default();
        for outcome in outcomes {
            match outcome {
                Ok((descriptor, warning)) => {
                    report.warnings.extend(warning);
                    report.descriptors.insert(descriptor.name.clone(), descriptor);
                }
                Err(error) => {
                    warn!("{}", error);
                    report.failures.push(error);
                }
            }
        }

        report.failures.sort_by(|a, b| a.app().cmp(b.app()));
        report.warnings.sort_by(|a, b| a.app.cmp(&b.app));

        info!(
            "Resolved {} launchers ({} failed, {} icon warnings)",
            report.descriptors.len(),
            report.failures.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn process(&self, app: &WebApp) -> AppOutcome {
        if !is_absolute_http_url(&app.url) {
            return Err(LauncherError::InvalidUrl {
                app: app.name.clone(),
                url: app.url.clone(),
            });
        }

        let ctx = LaunchContext {
            registry: &self.registry,
            default_browser: self.default_browser.as_deref(),
            pwa_runtime: self.pwa_runtime.as_ref(),
        };
        let exec = build_launch_command(app, &ctx)?;

        let reference = IconReference::for_app(app);
        let (icon, warning) = match self.icons.resolve(&reference, app.icon_sha256.as_deref()) {
            Ok(path) => {
                debug!("{}: icon {}", app.name, path.display());
                (Some(path), None)
            }
            Err(error) => {
                let warning = IconWarning {
                    app: app.name.clone(),
                    reference: reference.to_string(),
                    error,
                };
                warn!("{}", warning);
                (None, Some(warning))
            }
        };

        let descriptor = LaunchDescriptor::new(
            &app.name,
            Some(app.comment_or_name()),
            exec,
            icon,
            &app.mime_types,
        );
        Ok((descriptor, warning))
    }
}

type AppOutcome = Result<(LaunchDescriptor, Option<IconWarning>), LauncherError>;

/// Names must be non-blank and map to distinct descriptor files.
fn check_names(apps: &[WebApp]) -> Result<(), LauncherError> {
    let mut files: HashMap<String, &str> = HashMap::new();
    for app in apps {
        if app.name.trim().is_empty() {
            return Err(LauncherError::EmptyAppName {
                url: app.url.clone(),
            });
        }
        if let Some(first) = files.insert(desktop_file_name(&app.name), &app.name) {
            debug!("{:?} and {:?} share a descriptor file", first, app.name);
            return Err(LauncherError::DuplicateAppName {
                name: app.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn no_icons(_: &IconReference, _: Option<&str>) -> Result<PathBuf, IconError> {
        Ok(PathBuf::from("/icons/default.png"))
    }

    #[test]
    fn test_check_names() {
        let apps = vec![WebApp::new("a", "https://a.com"), WebApp::new("b", "https://b.com")];
        assert!(check_names(&apps).is_ok());

        let apps = vec![WebApp::new("a", "https://a.com"), WebApp::new("a", "https://b.com")];
        assert_eq!(
            check_names(&apps),
            Err(LauncherError::DuplicateAppName { name: "a".into() })
        );

        let apps = vec![WebApp::new(" ", "https://a.com")];
        assert!(matches!(check_names(&apps), Err(LauncherError::EmptyAppName { .. })));
    }

    #[test]
    fn test_names_sharing_a_file_are_duplicates() {
        let set = LauncherSet::new(no_icons).with_default_browser(Some("brave".into()));
        let apps = vec![
            WebApp::new("a/b", "https://a.com"),
            WebApp::new("a-b", "https://b.com"),
        ];
        assert_eq!(
            set.build(&apps).unwrap_err(),
            LauncherError::DuplicateAppName { name: "a-b".into() }
        );
    }

    #[test]
    fn test_worker_pool_is_bounded() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (a, p) = (active.clone(), peak.clone());
        let set = LauncherSet::new(move |_: &IconReference, _: Option<&str>| -> Result<PathBuf, IconError> {
            let now = a.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            a.fetch_sub(1, Ordering::SeqCst);
            Ok(PathBuf::from("/icons/x.png"))
        })
        .with_default_browser(Some("firefox".into()));

        let apps: Vec<WebApp> = (0..40)
            .map(|i| WebApp::new(format!("app{i}"), format!("https://app{i}.example")))
            .collect();
        let report = set.build(&apps).unwrap();

        assert_eq!(report.descriptors.len(), 40);
        assert!(peak.load(Ordering::SeqCst) <= MAX_WORKERS);
    }

    #[test]
    fn test_blank_browser_is_missing() {
        let set = LauncherSet::new(no_icons);
        let app = WebApp {
            browser: Some("  ".into()),
            ..WebApp::new("a", "https://a.com")
        };
        assert_eq!(
            set.build(&[app]).unwrap().failures,
            vec![LauncherError::MissingBrowser { app: "a".into() }]
        );
    }

    #[test]
    fn test_invalid_url_is_isolated() {
        let set = LauncherSet::new(no_icons).with_default_browser(Some("brave".into()));
        let apps = vec![
            WebApp::new("broken", "slack.com"),
            WebApp::new("slack", "https://slack.com"),
        ];

        let report = set.build(&apps).unwrap();
        assert_eq!(report.descriptors.len(), 1);
        assert!(report.descriptors.contains_key("slack"));
        assert_eq!(
            report.failures,
            vec![LauncherError::InvalidUrl {
                app: "broken".into(),
                url: "slack.com".into(),
            }]
        );
    }

    #[test]
    fn test_icon_failure_is_a_warning() {
        let set = LauncherSet::new(|r: &IconReference, _: Option<&str>| -> Result<PathBuf, IconError> {
            Err(IconError::Download(format!("{r}: offline")))
        })
        .with_default_browser(Some("firefox".into()));

        let report = set.build(&[WebApp::new("slack", "https://slack.com")]).unwrap();
        assert!(!report.has_failures());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].reference, "https://slack.com/favicon.ico");
        assert!(report.descriptors["slack"].icon.is_none());
    }

    #[test]
    fn test_icons_not_resolved_for_failed_apps() {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let seen = requested.clone();
        let set = LauncherSet::new(move |r: &IconReference, _: Option<&str>| -> Result<PathBuf, IconError> {
            seen.lock().unwrap().push(r.to_string());
            Ok(PathBuf::from("/icons/x.png"))
        });

        let report = set.build(&[WebApp::new("slack", "https://slack.com")]).unwrap();
        assert!(report.has_failures());
        assert!(requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_checksum_is_passed_to_resolver() {
        let set = LauncherSet::new(|_: &IconReference, sha: Option<&str>| -> Result<PathBuf, IconError> {
            assert_eq!(sha, Some("abc123"));
            Ok(PathBuf::from("/icons/x.png"))
        })
        .with_default_browser(Some("brave".into()));

        let app = WebApp {
            icon: Some("https://cdn.example.org/x.png".into()),
            icon_sha256: Some("abc123".into()),
            ..WebApp::new("x", "https://example.org")
        };
        let report = set.build(&[app]).unwrap();
        assert_eq!(
            report.descriptors["x"].icon.as_deref(),
            Some(std::path::Path::new("/icons/x.png"))
        );
    }
}
