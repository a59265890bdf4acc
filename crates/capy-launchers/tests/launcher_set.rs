use capy_launchers::{
    BrowserDescriptor, BrowserRegistry, DirectorySink, EngineFamily, IconError, IconReference,
    InstallState, LauncherError, LauncherSet, PwaOptions, WebApp, install, parse_desktop_entry,
    prune,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn recording_resolver(
    log: Arc<Mutex<Vec<String>>>,
) -> impl Fn(&IconReference, Option<&str>) -> Result<PathBuf, IconError> + Send + Sync + 'static {
    move |reference: &IconReference, _: Option<&str>| {
        log.lock().unwrap().push(reference.to_string());
        match reference {
            IconReference::Remote(url) if url.contains("offline") => {
                Err(IconError::Download(format!("{url}: connection refused")))
            }
            _ => Ok(PathBuf::from("/cache/icon.ico")),
        }
    }
}

fn apps() -> Vec<WebApp> {
    vec![
        WebApp {
            browser: Some("brave".into()),
            mime_types: vec!["x-scheme-handler/slack".into()],
            ..WebApp::new("slack", "https://slack.com")
        },
        WebApp {
            comment: Some("Code hosting".into()),
            ..WebApp::new("github", "https://github.com/foo")
        },
        WebApp {
            browser: Some("unknown-browser".into()),
            ..WebApp::new("mystery", "https://mystery.example")
        },
        WebApp {
            exec: Some("firefox --new-window %U".into()),
            browser: Some("unknown-browser".into()),
            ..WebApp::new("custom", "https://custom.example")
        },
        WebApp::new("offline", "https://offline.example/app"),
        WebApp {
            pwa: Some(PwaOptions {
                enabled: true,
                manifest_url: None,
                profile: Some("work".into()),
            }),
            ..WebApp::new("element", "https://app.element.io")
        },
    ]
}

#[test]
fn full_run_isolates_failures() {
    let requested = Arc::new(Mutex::new(Vec::new()));
    let set = LauncherSet::new(recording_resolver(requested.clone()))
        .with_default_browser(Some("firefox".into()));

    let report = set.build(&apps()).unwrap();

    assert_eq!(
        report.descriptors.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["custom", "element", "github", "offline", "slack"]
    );
    assert_eq!(
        report.failures,
        vec![LauncherError::UnsupportedBrowser {
            app: "mystery".into(),
            browser: "unknown-browser".into(),
        }]
    );
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].app, "offline");
    assert!(report.descriptors["offline"].icon.is_none());

    assert_eq!(
        report.descriptors["slack"].exec,
        r#"brave --new-window --class="WebApp-slack-com" --app="https://slack.com""#
    );
    assert_eq!(
        report.descriptors["github"].exec,
        r#"firefox --new-window --class "WebApp-github-com" "https://github.com/foo""#
    );
    assert_eq!(report.descriptors["custom"].exec, "firefox --new-window %U");
    assert_eq!(
        report.descriptors["element"].exec,
        r#"firefoxpwa site launch --manifest "https://app.element.io/manifest.json" --profile "work""#
    );

    let mut requested = requested.lock().unwrap().clone();
    requested.sort();
    assert!(requested.contains(&"https://github.com/favicon.ico".to_string()));
    assert!(!requested.iter().any(|r| r.contains("mystery")));
}

#[test]
fn duplicate_names_abort_before_processing() {
    let requested = Arc::new(Mutex::new(Vec::new()));
    let set = LauncherSet::new(recording_resolver(requested.clone()))
        .with_default_browser(Some("brave".into()));

    let mut list = apps();
    list.push(WebApp::new("slack", "https://app.slack.com"));

    assert_eq!(
        set.build(&list).unwrap_err(),
        LauncherError::DuplicateAppName {
            name: "slack".into()
        }
    );
    assert!(requested.lock().unwrap().is_empty());
}

#[test]
fn custom_registry_entries_are_used() {
    let registry = BrowserRegistry::with_extra([BrowserDescriptor::new(
        "cromite",
        EngineFamily::Chromium,
        "/opt/cromite/chrome",
    )]);
    let set = LauncherSet::new(recording_resolver(Arc::default()))
        .with_registry(registry)
        .with_default_browser(Some("cromite".into()));

    let report = set.build(&[WebApp::new("mail", "https://mail.google.com/mail")]).unwrap();
    assert_eq!(
        report.descriptors["mail"].exec,
        r#"/opt/cromite/chrome --new-window --class="WebApp-mail-google-com" --app="https://mail.google.com/mail""#
    );
}

#[test]
fn descriptors_survive_install_and_parse() {
    let dir = tempfile::tempdir().unwrap();
    let set = LauncherSet::new(recording_resolver(Arc::default()))
        .with_default_browser(Some("firefox".into()));
    let report = set.build(&apps()).unwrap();

    let mut sink = DirectorySink::new(dir.path());
    let installed = install(report.descriptors.values(), &mut sink).unwrap();
    assert_eq!(installed.len(), report.descriptors.len());

    for descriptor in report.descriptors.values() {
        let content = std::fs::read_to_string(dir.path().join(descriptor.file_name())).unwrap();
        let parsed = parse_desktop_entry(&content).unwrap();
        assert_eq!(parsed.name, descriptor.name);
        assert_eq!(parsed.comment.as_deref(), Some(descriptor.comment.as_str()));
        assert_eq!(parsed.exec, descriptor.exec);
        assert_eq!(parsed.mime_types, descriptor.mime_types);
    }

    // A later run without "slack" removes only its launcher.
    let previous = InstallState { files: installed };
    previous.save(dir.path()).unwrap();
    let current = previous
        .files
        .iter()
        .filter(|f| *f != "slack.desktop")
        .cloned()
        .collect();
    let removed = prune(dir.path(), &InstallState::load(dir.path()), &current).unwrap();
    assert_eq!(removed, vec!["slack.desktop"]);
    assert!(dir.path().join("github.desktop").exists());
}

#[test]
fn unsafe_urls_and_commands_fail_only_their_app() {
    let set = LauncherSet::new(recording_resolver(Arc::default()))
        .with_default_browser(Some("brave".into()));
    let apps = vec![
        WebApp::new("quoted", "https://a.com/\"x"),
        WebApp {
            exec: Some("run-it\nTerminal=true".into()),
            ..WebApp::new("injected", "https://b.com")
        },
        WebApp::new("fine", "https://c.com"),
    ];

    let report = set.build(&apps).unwrap();
    assert_eq!(
        report.descriptors.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["fine"]
    );
    assert_eq!(
        report.failures.iter().map(|f| f.app()).collect::<Vec<_>>(),
        vec!["injected", "quoted"]
    );
    assert!(matches!(report.failures[0], LauncherError::InvalidExec { .. }));
    assert!(matches!(report.failures[1], LauncherError::InvalidUrl { .. }));
}
