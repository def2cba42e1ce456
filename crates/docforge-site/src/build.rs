//! The build pipeline.
//!
//! One pass over the input tree: every file is copied to the output as-is,
//! document sources additionally render to an `.html` page next to the copy.
//! The link graph accumulates during the walk; orphan detection runs once
//! at the end against the configured root.

use crate::emitter::HtmlEmitter;
use crate::repository::DirRepository;
use docforge_core::config::SiteConfig;
use docforge_core::error::{Error, Result};
use docforge_core::models::DocError;
use docforge_core::uri::{self, DOC_SUFFIX};
use docforge_graph::{LinkGraph, Orphans, filter_out_orphans, find_orphans, ignore_pattern};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a full site build.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    /// Documents rendered
    pub documents: usize,
    /// Plain files copied
    pub files: usize,
    /// Per-document diagnostics (parse and emission), keyed by logical URI
    pub file_errors: BTreeMap<String, Vec<DocError>>,
    /// Paths that could not be processed at all
    pub failed_paths: Vec<String>,
    /// Unreachable documents and files after ignore filtering
    pub orphans: Orphans,
}

impl BuildReport {
    /// Whether the build should be treated as failed. Only paths that could
    /// not be processed at all fail the run; document diagnostics and
    /// orphans are printed findings with rendering having continued.
    pub fn failed(&self) -> bool {
        !self.failed_paths.is_empty()
    }
}

/// Builds a complete site from an input tree into an output directory.
pub struct SiteBuilder {
    input_root: PathBuf,
    output_root: PathBuf,
    config: SiteConfig,
    repository: DirRepository,
}

impl SiteBuilder {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Result<Self> {
        let input_root = input_root.into();
        if !input_root.is_dir() {
            return Err(Error::bad_input_root(input_root));
        }
        let config = SiteConfig::load(&input_root)?;
        let repository = DirRepository::new(&input_root);
        Ok(Self {
            input_root,
            output_root: output_root.into(),
            config,
            repository,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the full build.
    ///
    /// A failing file is logged and recorded, never fatal; only input-level
    /// problems (unreadable root, bad configuration) abort the build.
    pub fn build(&self) -> Result<BuildReport> {
        // Validate the ignore pattern before doing any work.
        let pattern = ignore_pattern(&self.config.ignore_orphans)?;

        std::fs::create_dir_all(&self.output_root)?;

        let mut report = BuildReport::default();
        let mut graph = LinkGraph::new();
        let emitter = HtmlEmitter::new(&self.repository);

        let walker = WalkDir::new(&self.input_root)
            .sort_by_file_name()
            .into_iter()
            // The root itself may be a dot-directory; only entries below it
            // are subject to the hidden rule.
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Cannot walk input tree: {}", e);
                    report.failed_paths.push(e.to_string());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if let Err(e) = self.process_file(path, &emitter, &mut graph, &mut report) {
                log::warn!("Failed to process {}: {}", path.display(), e);
                report.failed_paths.push(path.display().to_string());
            }
        }

        let orphans = find_orphans(&graph, &self.config.root);
        report.orphans = filter_out_orphans(orphans, &pattern);

        log::info!(
            "Build finished: {} documents, {} files, {} documents with diagnostics",
            report.documents,
            report.files,
            report.file_errors.len()
        );
        Ok(report)
    }

    fn process_file(
        &self,
        path: &Path,
        emitter: &HtmlEmitter,
        graph: &mut LinkGraph,
        report: &mut BuildReport,
    ) -> Result<()> {
        let rel = path
            .strip_prefix(&self.input_root)
            .map_err(|e| Error::other(e.to_string()))?;
        let file_uri = uri::uri_for_rel_path(rel);

        // Every input file lands in the output verbatim, sources included.
        let out_path = self.output_root.join(rel);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(path, &out_path)?;

        match uri::doc_uri_for_file(&file_uri) {
            Some(doc_uri) => {
                let doc = self.repository.document_at(path)?;
                graph.add_document(&doc_uri, &doc.body);

                let page = emitter.emit(&doc_uri, &doc, &self.config.extra_styles);
                let html_path = swap_doc_suffix(&out_path);
                std::fs::write(&html_path, &page.html)?;
                report.documents += 1;

                let mut errors = doc.errors.clone();
                errors.extend(page.errors);
                errors.sort_by_key(|e| e.line);
                if !errors.is_empty() {
                    report.file_errors.insert(doc_uri, errors);
                }
            }
            None => {
                graph.add_file(&file_uri);
                report.files += 1;
            }
        }
        Ok(())
    }
}

/// Whether a path component hides the entry from the build (dotfiles).
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// `<out>/a/b/c.txt` -> `<out>/a/b/c.html`
fn swap_doc_suffix(out_path: &Path) -> PathBuf {
    let s = out_path.to_string_lossy();
    match s.strip_suffix(DOC_SUFFIX) {
        Some(stem) => PathBuf::from(format!("{}.html", stem)),
        None => out_path.with_extension("html"),
    }
}
