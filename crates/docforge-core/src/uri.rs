//! Logical URI handling.
//!
//! A logical URI is a slash-separated path string rooted at the input tree:
//! a document at `<root>/a/b/c.txt` is addressed as `/a/b/c` (source suffix
//! stripped); a plain file keeps its relative path including extension,
//! prefixed with `/`. Logical URIs are distinct from the physical paths used
//! to read bytes from disk; the repository owns that mapping.

use std::path::Path;

/// Source suffix for document files.
pub const DOC_SUFFIX: &str = ".txt";

/// File name of the site configuration, relative to the input root.
pub const CONFIG_FILE: &str = "site.yaml";

/// Logical URI of the site configuration resource.
pub const CONFIG_URI: &str = "/site.yaml";

/// A reference to a document, optionally to a fragment inside it.
///
/// `internal == true` means "fragment inside the document currently being
/// rendered"; such targets are checked against the enclosing document's own
/// anchor set and never trigger a repository lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTarget {
    pub uri: String,
    pub frag: Option<String>,
    pub internal: bool,
}

impl DocTarget {
    /// Target for another document, optionally with a fragment.
    pub fn document(uri: impl Into<String>, frag: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            frag,
            internal: false,
        }
    }

    /// Target for a fragment of the enclosing document.
    pub fn internal(frag: impl Into<String>) -> Self {
        Self {
            uri: String::new(),
            frag: Some(frag.into()),
            internal: true,
        }
    }
}

/// Classification of a raw link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Another document or a fragment, possibly of the enclosing document
    Doc(DocTarget),
    /// A raw file inside the site (image, download, ...)
    Resource(String),
    /// An external URL, passed through untouched
    External(String),
}

/// Classify a raw link destination written inside the document whose
/// directory URI is `base_dir` (e.g. `/a/` for the document `/a/b`).
///
/// Rules:
/// - `#frag` alone is an internal fragment of the enclosing document;
/// - a `scheme:` prefix makes the target external;
/// - a target whose last path segment has an extension is a raw resource;
/// - everything else is a document reference with an optional `#frag`.
///
/// Relative targets are resolved against `base_dir` with `.` and `..`
/// folded; absolute targets (leading `/`) are taken as-is.
pub fn classify(base_dir: &str, raw: &str) -> LinkTarget {
    let raw = raw.trim();

    if let Some(frag) = raw.strip_prefix('#') {
        return LinkTarget::Doc(DocTarget::internal(frag));
    }

    if leading_scheme(raw).is_some() {
        return LinkTarget::External(raw.to_string());
    }

    let (path, frag) = match raw.split_once('#') {
        Some((p, f)) if !f.is_empty() => (p, Some(f.to_string())),
        Some((p, _)) => (p, None),
        None => (raw, None),
    };

    let uri = resolve(base_dir, path);

    if has_extension(&uri) {
        LinkTarget::Resource(uri)
    } else {
        LinkTarget::Doc(DocTarget::document(uri, frag))
    }
}

/// The `scheme` of `raw` if it starts with one (`http:`, `mailto:`, ...).
/// A colon only counts before the first `/` or `#`.
pub fn leading_scheme(raw: &str) -> Option<&str> {
    let end = raw.find(['/', '#']).unwrap_or(raw.len());
    let colon = raw[..end].find(':')?;
    let scheme = &raw[..colon];
    if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(scheme)
    } else {
        None
    }
}

/// Resolve `path` against `base_dir`, folding `.` and `..` segments.
/// Always returns a URI with a leading slash.
fn resolve(base_dir: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        segments.extend(base_dir.split('/').filter(|s| !s.is_empty()));
    }
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let mut uri = String::from("/");
    uri.push_str(&segments.join("/"));
    uri
}

/// Whether the last segment of a URI carries an extension.
fn has_extension(uri: &str) -> bool {
    base_name(uri).rfind('.').is_some_and(|i| i > 0)
}

/// Last path segment of a logical URI (`/a/b/c` -> `c`).
pub fn base_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Directory URI of a document URI (`/a/b/c` -> `/a/b/`).
pub fn dir_uri(doc_uri: &str) -> String {
    match doc_uri.rfind('/') {
        Some(i) => doc_uri[..=i].to_string(),
        None => "/".to_string(),
    }
}

/// Logical URI for a path relative to the input root.
pub fn uri_for_rel_path(rel: &Path) -> String {
    let mut uri = String::new();
    for component in rel.components() {
        uri.push('/');
        uri.push_str(&component.as_os_str().to_string_lossy());
    }
    if uri.is_empty() { "/".to_string() } else { uri }
}

/// Document URI for a file URI carrying the document source suffix,
/// `None` when the file is not a document.
pub fn doc_uri_for_file(file_uri: &str) -> Option<String> {
    file_uri
        .strip_suffix(DOC_SUFFIX)
        .map(|stripped| stripped.to_string())
}

/// Strip a `#fragment` suffix, yielding the owning node URI.
pub fn strip_fragment(target: &str) -> &str {
    match target.split_once('#') {
        Some((uri, _)) => uri,
        None => target,
    }
}

/// Relative href from the directory `dir` (e.g. `/a/`) to the node `target`.
/// Document targets get the `.html` suffix appended by the caller.
pub fn relative_href(dir: &str, target: &str) -> String {
    let dir_segs: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    let target_segs: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let Some((name, parent_segs)) = target_segs.split_last() else {
        return ".".to_string();
    };

    // Only the target's directory takes part in the common prefix; the file
    // name itself is always emitted.
    let common = dir_segs
        .iter()
        .zip(parent_segs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..dir_segs.len() {
        parts.push("..");
    }
    parts.extend(&parent_segs[common..]);
    parts.push(name);
    parts.join("/")
}
