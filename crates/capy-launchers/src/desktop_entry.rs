//! Desktop entry generation and parsing.

use std::collections::HashMap;
use std::path::PathBuf;

/// A fully resolved launcher, ready to be written as a .desktop file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchDescriptor {
    pub name: String,
    pub comment: String,
    pub exec: String,
    /// `None` when the icon could not be resolved.
    pub icon: Option<PathBuf>,
    /// Deduplicated, in declaration order.
    pub mime_types: Vec<String>,
}

impl LaunchDescriptor {
    /// Assemble a descriptor. A blank comment falls back to `name`.
    pub fn new(
        name: &str,
        comment: Option<&str>,
        exec: String,
        icon: Option<PathBuf>,
        mime_types: &[String],
    ) -> Self {
        let comment = match comment {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => name.to_string(),
        };

        let mut unique: Vec<String> = Vec::with_capacity(mime_types.len());
        for mime in mime_types.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
            if !unique.iter().any(|u| u == mime) {
                unique.push(mime.to_string());
            }
        }

        Self {
            name: name.to_string(),
            comment,
            exec,
            icon,
            mime_types: unique,
        }
    }

    /// File name the descriptor is installed under, e.g. "slack.desktop".
    pub fn file_name(&self) -> String {
        desktop_file_name(&self.name)
    }

    /// Serialize into the desktop entry format.
    pub fn render(&self) -> String {
        let mut out = String::from("[Desktop Entry]\n");
        out.push_str("Version=1.0\n");
        out.push_str(&format!("Name={}\n", escape_value(&self.name)));
        out.push_str(&format!("Comment={}\n", escape_value(&self.comment)));
        out.push_str(&format!("Exec={}\n", self.exec));
        out.push_str("Terminal=false\n");
        out.push_str("Type=Application\n");
        if let Some(icon) = &self.icon {
            out.push_str(&format!("Icon={}\n", icon.display()));
        }
        out.push_str("StartupNotify=true\n");
        if !self.mime_types.is_empty() {
            out.push_str(&format!("MimeType={};\n", self.mime_types.join(";")));
        }
        out
    }
}

/// File name used for an app called `name`. Distinct names may map to the same file.
pub fn desktop_file_name(name: &str) -> String {
    format!("{}.desktop", name.replace('/', "-"))
}

/// Fields read back from a desktop entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedEntry {
    pub name: String,
    pub comment: Option<String>,
    pub exec: String,
    pub icon: Option<String>,
    pub mime_types: Vec<String>,
}

/// Key/value pairs of the `[Desktop Entry]` group. The first occurrence of a key wins.
fn main_group(content: &str) -> HashMap<&str, &str> {
    let mut group = HashMap::new();
    let mut current: Option<&str> = None;

    for raw in content.lines() {
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current = Some(header);
            continue;
        }

        if current != Some("Desktop Entry") {
            continue;
        }
        // Values keep trailing whitespace, leading blanks are encoded as `\s`.
        if let Some((key, value)) = line.split_once('=') {
            group
                .entry(key.trim())
                .or_insert_with(|| value.trim_start_matches([' ', '\t']));
        }
    }
    group
}

/// Parse the `[Desktop Entry]` group of an application desktop file.
pub fn parse_desktop_entry(content: &str) -> Option<ParsedEntry> {
    let group = main_group(content);
    if group.get("Type").map(|t| t.trim()) != Some("Application") {
        return None;
    }

    let mime_types = group
        .get("MimeType")
        .map(|list| {
            list.split(';')
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Some(ParsedEntry {
        name: unescape_value(group.get("Name")?),
        comment: group.get("Comment").map(|c| unescape_value(c)),
        exec: group.get("Exec")?.to_string(),
        icon: group.get("Icon").map(|i| i.to_string()),
        mime_types,
    })
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
