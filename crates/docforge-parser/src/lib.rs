//! # Docforge Parser
//!
//! Markup parser for docforge documents, built on `pulldown-cmark`.
//!
//! This crate provides:
//! - [`parse`] - fold the event stream into the [`ParsedDocument`] tree
//! - [`extract_anchors`] - the fragment identifiers a body defines
//! - [`slugify`] - the heading-text-to-anchor rule
//!
//! Malformed markup never fails a parse; it degrades into per-line
//! diagnostics on the document (`DocError`). I/O and decoding are the
//! caller's concern - this crate only ever sees strings.

mod anchors;
mod engine;

pub use anchors::{extract_anchors, slugify};
pub use engine::parse;

// Re-export the document model for consumers that only need parsing.
pub use docforge_core::models::{Block, DocError, ErrorKind, Inline, ParsedDocument};
