//! URL helpers: origin and window class derivation.
//!
//! All functions are plain string operations, no environment is consulted, so the
//! same URL always gives the same output.

/// Split `scheme://host/...` into `(scheme, host)`.
fn split_origin(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme_ok = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok {
        return None;
    }

    let host = host_part(rest);
    if host.is_empty() {
        return None;
    }
    Some((scheme, host))
}

/// Everything before the first path, query or fragment delimiter.
fn host_part(rest: &str) -> &str {
    rest.split(['/', '?', '#']).next().unwrap_or_default()
}

/// `scheme://host` of a URL.
///
/// Strings that don't look like `scheme://host` are returned unchanged.
pub fn base_origin(url: &str) -> String {
    match split_origin(url) {
        Some((scheme, host)) => format!("{scheme}://{host}"),
        None => url.to_string(),
    }
}

/// Window class used to group all windows of one web app.
/// "https://mail.google.com/mail" -> "WebApp-mail-google-com"
pub fn window_class(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    format!("WebApp-{}", host_part(rest).replace('.', "-"))
}

/// Whether `url` is an absolute http(s) URL with a host that can be quoted in a command line.
pub fn is_absolute_http_url(url: &str) -> bool {
    let unquotable = |c: char| c.is_whitespace() || c.is_control() || matches!(c, '"' | '`' | '\\');
    if url.chars().any(unquotable) {
        return false;
    }
    match split_origin(url) {
        Some((scheme, _)) => {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        None => false,
    }
}

/// Conventional favicon location of the site serving `url`.
pub fn favicon_url(url: &str) -> String {
    format!("{}/favicon.ico", base_origin(url))
}
