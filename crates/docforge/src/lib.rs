//! # Docforge
//!
//! Static documentation site generator. Documents are plain-markup `.txt`
//! sources addressed by logical URIs; a build renders them to HTML, checks
//! every internal link and fragment, and reports documents and files that
//! cannot be reached from the site root.
//!
//! This crate re-exports the public surface of the workspace; the member
//! crates hold the implementation:
//! - `docforge-core`: models, logical URIs, configuration, errors
//! - `docforge-parser`: markup parsing and anchor extraction
//! - `docforge-graph`: link graph and orphan detection
//! - `docforge-site`: repository, HTML emission, the build pipeline

pub use docforge_core::config::SiteConfig;
pub use docforge_core::error::{Error, Result};
pub use docforge_core::models::{Block, DocError, ErrorKind, Inline, ParsedDocument};
pub use docforge_core::uri;
pub use docforge_graph::{LinkGraph, Orphans, filter_out_orphans, find_orphans};
pub use docforge_parser::{extract_anchors, parse, slugify};
pub use docforge_site::{BuildReport, DirRepository, DocRepository, HtmlEmitter, SiteBuilder};
