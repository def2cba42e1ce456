//! Site link graph.
//!
//! Two disjoint node sets (documents and plain files) keyed by logical URI,
//! plus the outgoing link targets recorded per document. Registration uses
//! set semantics throughout: adding the same node or edge twice is a no-op.

use docforge_core::models::{Block, Inline};
use docforge_core::uri::{self, LinkTarget};
use std::collections::{BTreeMap, BTreeSet};

/// Accumulating model of every document, plain file and link in the site.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    documents: BTreeSet<String>,
    files: BTreeSet<String>,
    /// Per document, every outgoing link target (documents, fragments of
    /// documents, files). Fragment suffixes are preserved here; reachability
    /// normalizes them to the owning document node.
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl LinkGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document and every outgoing reference its body contains.
    /// Idempotent: re-registering the same URI duplicates nothing.
    pub fn add_document(&mut self, doc_uri: &str, body: &[Block]) {
        self.documents.insert(doc_uri.to_string());
        let base_dir = uri::dir_uri(doc_uri);
        let targets = self.edges.entry(doc_uri.to_string()).or_default();
        collect_targets(body, &base_dir, doc_uri, targets);
    }

    /// Register a plain file node. Plain files carry no outgoing edges.
    pub fn add_file(&mut self, file_uri: &str) {
        self.files.insert(file_uri.to_string());
    }

    /// All registered document URIs
    pub fn documents(&self) -> &BTreeSet<String> {
        &self.documents
    }

    /// All registered plain file URIs
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    /// Outgoing link targets of a document, if registered
    pub fn targets_of(&self, doc_uri: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(doc_uri)
    }

    /// Iterate (source document, outgoing targets)
    pub fn edges(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.edges.iter()
    }

    /// Total node count (documents plus files)
    pub fn node_count(&self) -> usize {
        self.documents.len() + self.files.len()
    }

    /// Total recorded link target count
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}

/// Walk a body and record every linked node URI into `out`.
///
/// Internal fragments resolve to the owning document itself; external URLs
/// are not part of the site graph.
fn collect_targets(blocks: &[Block], base_dir: &str, own_uri: &str, out: &mut BTreeSet<String>) {
    for block in blocks {
        match block {
            Block::Paragraph(inlines) | Block::Heading { text: inlines, .. } => {
                collect_inline_targets(inlines, base_dir, own_uri, out);
            }
            Block::BlockQuote(inner) => collect_targets(inner, base_dir, own_uri, out),
            Block::List { items, .. } => {
                for item in items {
                    collect_targets(item, base_dir, own_uri, out);
                }
            }
            Block::CodeBlock { .. } | Block::Rule => {}
        }
    }
}

fn collect_inline_targets(
    inlines: &[Inline],
    base_dir: &str,
    own_uri: &str,
    out: &mut BTreeSet<String>,
) {
    for inline in inlines {
        match inline {
            Inline::Link { target, text, .. } => {
                record_target(target, base_dir, own_uri, out);
                collect_inline_targets(text, base_dir, own_uri, out);
            }
            Inline::Image { target, .. } => record_target(target, base_dir, own_uri, out),
            Inline::Emphasis(inner) | Inline::Strong(inner) => {
                collect_inline_targets(inner, base_dir, own_uri, out);
            }
            _ => {}
        }
    }
}

fn record_target(raw: &str, base_dir: &str, own_uri: &str, out: &mut BTreeSet<String>) {
    if raw.trim().is_empty() {
        return;
    }
    match uri::classify(base_dir, raw) {
        LinkTarget::Doc(target) => {
            let node = if target.internal {
                own_uri.to_string()
            } else {
                target.uri
            };
            match target.frag {
                Some(frag) if !target.internal => out.insert(format!("{}#{}", node, frag)),
                _ => out.insert(node),
            };
        }
        LinkTarget::Resource(resource_uri) => {
            out.insert(resource_uri);
        }
        LinkTarget::External(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_parser::parse;

    #[test]
    fn test_add_file_and_document() {
        let mut graph = LinkGraph::new();
        graph.add_file("/img/logo.png");
        graph.add_document("/home", &parse("# Home\n").body);

        assert_eq!(graph.node_count(), 2);
        assert!(graph.documents().contains("/home"));
        assert!(graph.files().contains("/img/logo.png"));
    }

    #[test]
    fn test_edges_from_body() {
        let mut graph = LinkGraph::new();
        let doc = parse("[guide](/guide) and ![logo](/img/logo.png) and [ext](https://e.com)\n");
        graph.add_document("/home", &doc.body);

        let targets = graph.targets_of("/home").unwrap();
        assert!(targets.contains("/guide"));
        assert!(targets.contains("/img/logo.png"));
        // External links never become graph edges
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_fragment_edges_keep_fragment() {
        let mut graph = LinkGraph::new();
        let doc = parse("[setup](/guide#setup) and [here](#intro)\n");
        graph.add_document("/home", &doc.body);

        let targets = graph.targets_of("/home").unwrap();
        assert!(targets.contains("/guide#setup"));
        // Internal fragment resolves to the owning document node
        assert!(targets.contains("/home"));
    }

    #[test]
    fn test_relative_targets_resolved() {
        let mut graph = LinkGraph::new();
        let doc = parse("[sibling](other) and [up](../top)\n");
        graph.add_document("/a/b", &doc.body);

        let targets = graph.targets_of("/a/b").unwrap();
        assert!(targets.contains("/a/other"));
        assert!(targets.contains("/top"));
    }

    #[test]
    fn test_idempotent_registration() {
        let mut graph = LinkGraph::new();
        let doc = parse("[guide](/guide)\n");
        graph.add_document("/home", &doc.body);
        let first_edges = graph.targets_of("/home").unwrap().clone();

        graph.add_document("/home", &doc.body);
        graph.add_file("/img/logo.png");
        graph.add_file("/img/logo.png");

        assert_eq!(graph.targets_of("/home").unwrap(), &first_edges);
        assert_eq!(graph.documents().len(), 1);
        assert_eq!(graph.files().len(), 1);
    }
}
