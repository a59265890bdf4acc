//! Icon references and resolvers.
//!
//! The engine only decides *which* icon an app wants; turning that into a
//! readable local file is the job of an [`IconResolver`].

use crate::app::WebApp;
use crate::error::IconError;
use crate::url::favicon_url;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ICON_BYTES: u64 = 8 * 1024 * 1024;
const KNOWN_EXTENSIONS: &[&str] = &["ico", "png", "svg", "xpm", "webp", "jpg", "jpeg"];

/// Where an icon comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IconReference {
    Remote(String),
    Local(PathBuf),
}

impl IconReference {
    /// Classify a user supplied icon string.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return IconReference::Remote(raw.to_string());
        }
        if let Some(path) = raw.strip_prefix("file://") {
            return IconReference::Local(PathBuf::from(path));
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return IconReference::Local(home.join(rest));
            }
        }
        IconReference::Local(PathBuf::from(raw))
    }

    /// The icon an app asks for: its explicit icon, or the site favicon.
    pub fn for_app(app: &WebApp) -> Self {
        match app.icon.as_deref().filter(|i| !i.is_empty()) {
            Some(icon) => Self::parse(icon),
            None => IconReference::Remote(favicon_url(&app.url)),
        }
    }
}

impl fmt::Display for IconReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconReference::Remote(url) => f.write_str(url),
            IconReference::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Turns an icon reference into a local file usable as `Icon=`.
pub trait IconResolver: Send + Sync {
    /// `sha256` is the expected hex digest of the icon content, if the app declared one.
    fn resolve(&self, reference: &IconReference, sha256: Option<&str>) -> Result<PathBuf, IconError>;
}

impl<F> IconResolver for F
where
    F: Fn(&IconReference, Option<&str>) -> Result<PathBuf, IconError> + Send + Sync,
{
    fn resolve(&self, reference: &IconReference, sha256: Option<&str>) -> Result<PathBuf, IconError> {
        self(reference, sha256)
    }
}

/// Resolver that checks local files and downloads remote icons into a cache directory.
///
/// Downloads are stored as `<sha256(url)>.<ext>` so repeated runs reuse them.
pub struct CachedIconResolver {
    cache_dir: PathBuf,
    agent: ureq::Agent,
}

impl CachedIconResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(DOWNLOAD_TIMEOUT).build();
        Self {
            cache_dir: cache_dir.into(),
            agent,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache file used for a remote icon.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let hash = hex::encode(hasher.finalize());
        self.cache_dir.join(format!("{}.{}", hash, icon_extension(url)))
    }

    fn resolve_local(&self, path: &Path, sha256: Option<&str>) -> Result<PathBuf, IconError> {
        if !path.is_file() {
            return Err(IconError::NotFound(path.to_path_buf()));
        }
        if let Some(expected) = sha256 {
            verify_checksum(&fs::read(path)?, expected)?;
        } else {
            // Make sure it is readable, not just present.
            fs::File::open(path)?;
        }
        Ok(path.to_path_buf())
    }

    fn resolve_remote(&self, url: &str, sha256: Option<&str>) -> Result<PathBuf, IconError> {
        let target = self.cache_path(url);

        if target.is_file() {
            let cached_ok = match sha256 {
                Some(expected) => verify_checksum(&fs::read(&target)?, expected).is_ok(),
                None => true,
            };
            if cached_ok {
                debug!("Using cached icon {} for {}", target.display(), url);
                return Ok(target);
            }
            debug!("Cached icon for {} fails checksum, downloading again", url);
        }

        let bytes = self.download(url)?;
        if let Some(expected) = sha256 {
            verify_checksum(&bytes, expected)?;
        }

        fs::create_dir_all(&self.cache_dir)?;
        let partial = target.with_extension("part");
        fs::write(&partial, &bytes)?;
        fs::rename(&partial, &target)?;

        info!("Downloaded icon {} -> {}", url, target.display());
        Ok(target)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, IconError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| IconError::Download(format!("{url}: {e}")))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ICON_BYTES)
            .read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            return Err(IconError::Download(format!("{url}: empty response")));
        }
        Ok(bytes)
    }
}

impl IconResolver for CachedIconResolver {
    fn resolve(&self, reference: &IconReference, sha256: Option<&str>) -> Result<PathBuf, IconError> {
        match reference {
            IconReference::Local(path) => self.resolve_local(path, sha256),
            IconReference::Remote(url) => self.resolve_remote(url, sha256),
        }
    }
}

/// File extension for a cached icon, taken from the URL path when it is a known image type.
fn icon_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last_segment = path.rsplit('/').next().unwrap_or_default();

    last_segment
        .rsplit_once('.')
        .and_then(|(_, ext)| {
            KNOWN_EXTENSIONS
                .iter()
                .find(|known| known.eq_ignore_ascii_case(ext))
                .copied()
        })
        .unwrap_or("ico")
}

fn verify_checksum(bytes: &[u8], expected: &str) -> Result<(), IconError> {
    let actual = hex::encode(Sha256::digest(bytes));
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(IconError::ChecksumMismatch {
            expected: expected.trim().to_string(),
            actual,
        })
    }
}
