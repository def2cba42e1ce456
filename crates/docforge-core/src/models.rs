//! Core data models for parsed documents.
//!
//! These types are designed to be:
//! - **Serializable**: report-facing types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Immutable after parse**: a [`ParsedDocument`] is never mutated once
//!   produced; consumers share it behind `Arc`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully parsed document: title, structured body and ordered diagnostics.
///
/// Produced once per physical path by the parser and cached for the lifetime
/// of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document title (first top-level heading, empty if none)
    pub title: String,
    /// Structured body tree
    pub body: Vec<Block>,
    /// Parse-time diagnostics, ordered by line
    pub errors: Vec<DocError>,
}

impl ParsedDocument {
    /// Create an empty document (no title, no body, no errors).
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            body: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// A block-level element in a document body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// Heading with its precomputed anchor slug
    Heading {
        level: u8,
        text: Vec<Inline>,
        anchor: String,
    },
    Paragraph(Vec<Inline>),
    List {
        ordered: bool,
        items: Vec<Vec<Block>>,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    BlockQuote(Vec<Block>),
    Rule,
}

/// An inline element inside a paragraph or heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    /// A reference to another document, fragment, resource or external URL.
    /// `target` is the raw link destination as written in the source.
    Link {
        target: String,
        text: Vec<Inline>,
        line: usize,
    },
    Image {
        target: String,
        alt: String,
        line: usize,
    },
    SoftBreak,
    HardBreak,
}

/// Collect the plain text of a run of inlines (link/image bodies included).
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_plain_text(inlines, &mut out);
    out
}

fn collect_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Emphasis(inner) | Inline::Strong(inner) => {
                collect_plain_text(inner, out);
            }
            Inline::Link { text, .. } => collect_plain_text(text, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
        }
    }
}

/// A per-document diagnostic with a 1-based source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl DocError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for DocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Classification of a per-document diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Link with an empty destination
    EmptyLinkTarget,
    /// Link scheme outside http/https/mailto
    UnsupportedScheme(String),
    /// Two headings slugify to the same anchor
    DuplicateAnchor(String),
    /// Emission-time: document or fragment target does not exist
    BrokenLink(String),
    /// Emission-time: raw resource target does not exist
    BrokenResource(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::EmptyLinkTarget => write!(f, "empty link target"),
            ErrorKind::UnsupportedScheme(s) => write!(f, "unsupported link scheme '{}'", s),
            ErrorKind::DuplicateAnchor(a) => write!(f, "duplicate anchor '{}'", a),
            ErrorKind::BrokenLink(t) => write!(f, "broken link '{}'", t),
            ErrorKind::BrokenResource(t) => write!(f, "broken resource link '{}'", t),
        }
    }
}

/// Pre-computed line starts for O(log n) line lookup.
///
/// Build once per document, then use for all position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts (line 1 = index 0)
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build line index in O(n) - do once per document.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in content.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Get the 1-based line number for a byte offset via binary search.
    pub fn line(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .max(1)
    }

    /// Get total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
