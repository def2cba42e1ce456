//! Document repository over a directory tree.
//!
//! The repository owns the logical-URI-to-physical-path mapping and the
//! parse cache. Within one run every document source is read and parsed at
//! most once; all consumers share the same `Arc<ParsedDocument>`.

use docforge_core::error::{Error, Result};
use docforge_core::models::ParsedDocument;
use docforge_core::uri::{self, DOC_SUFFIX};
use docforge_parser::extract_anchors;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Memoizing parse cache keyed by physical path.
///
/// Successful parses are cached for the lifetime of the run; failed reads
/// are not, so a path that becomes readable mid-run would be retried. The
/// counter exists for tests and diagnostics only.
#[derive(Debug, Default)]
pub struct DocCache {
    parsed: RefCell<HashMap<PathBuf, Arc<ParsedDocument>>>,
    parse_count: Cell<usize>,
}

impl DocCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the document at `path`, or return the cached result.
    ///
    /// Decoding is tolerant: invalid UTF-8 is replaced rather than failed,
    /// so only an I/O error can make resolution fail.
    pub fn resolve(&self, path: &Path) -> Result<Arc<ParsedDocument>> {
        if let Some(doc) = self.parsed.borrow().get(path) {
            return Ok(Arc::clone(doc));
        }

        let bytes =
            std::fs::read(path).map_err(|e| Error::parse_failure(path.to_path_buf(), e))?;
        let text = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        let doc = Arc::new(docforge_parser::parse(&text));
        self.parse_count.set(self.parse_count.get() + 1);
        self.parsed
            .borrow_mut()
            .insert(path.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }

    /// How many documents have actually been parsed (cache misses).
    pub fn parse_count(&self) -> usize {
        self.parse_count.get()
    }
}

/// Read-only queries the link resolver needs about the rest of the site.
pub trait DocRepository {
    /// Display title of a document: its first heading, or the last URI
    /// segment when the document has no heading or cannot be read.
    fn title(&self, doc_uri: &str) -> String;

    /// Whether a raw resource exists at this URI.
    fn resource_exists(&self, resource_uri: &str) -> bool;

    /// Fragment identifiers a document defines. `None` means the document
    /// itself is missing or unreadable; `Some` of an empty set means the
    /// document exists but defines no anchors. The distinction matters:
    /// a fragment into a missing document and a missing fragment in an
    /// existing document are both broken, a bare link to an existing
    /// anchor-less document is not.
    fn anchors(&self, doc_uri: &str) -> Option<HashSet<String>>;
}

/// Repository over a single input directory.
pub struct DirRepository {
    input_root: PathBuf,
    cache: DocCache,
}

impl DirRepository {
    pub fn new(input_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            cache: DocCache::new(),
        }
    }

    /// Physical source path of a document URI (`/a/b` -> `<root>/a/b.txt`).
    pub fn doc_path(&self, doc_uri: &str) -> PathBuf {
        let mut rel = doc_uri.trim_start_matches('/').to_string();
        rel.push_str(DOC_SUFFIX);
        self.input_root.join(rel)
    }

    /// Physical path of a raw resource URI.
    pub fn resource_path(&self, resource_uri: &str) -> PathBuf {
        self.input_root.join(resource_uri.trim_start_matches('/'))
    }

    /// Resolve a document through the parse cache.
    pub fn document(&self, doc_uri: &str) -> Result<Arc<ParsedDocument>> {
        self.cache.resolve(&self.doc_path(doc_uri))
    }

    /// Resolve a document by its physical path (walk-time entry point).
    pub fn document_at(&self, path: &Path) -> Result<Arc<ParsedDocument>> {
        self.cache.resolve(path)
    }

    pub fn parse_count(&self) -> usize {
        self.cache.parse_count()
    }
}

impl DocRepository for DirRepository {
    fn title(&self, doc_uri: &str) -> String {
        match self.document(doc_uri) {
            Ok(doc) if !doc.title.is_empty() => doc.title.clone(),
            _ => uri::base_name(doc_uri).to_string(),
        }
    }

    fn resource_exists(&self, resource_uri: &str) -> bool {
        self.resource_path(resource_uri).is_file()
    }

    fn anchors(&self, doc_uri: &str) -> Option<HashSet<String>> {
        match self.document(doc_uri) {
            Ok(doc) => Some(extract_anchors(&doc.body)),
            Err(e) => {
                log::debug!("Anchor lookup failed for {}: {}", doc_uri, e);
                None
            }
        }
    }
}
