//! Orphan detection.
//!
//! Reachability closure over the link graph from a configured root document,
//! computed once after the whole tree has been walked. Nodes never reached
//! are orphans; a post-pass drops URIs matching the ignore pattern.

use crate::graph::LinkGraph;
use docforge_core::error::{Error, Result};
use docforge_core::uri::{self, CONFIG_URI};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Documents and files with no reachability path from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orphans {
    pub documents: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

impl Orphans {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.files.is_empty()
    }
}

/// Compute the orphan sets of `graph` relative to `root`.
///
/// Edges carrying a fragment are normalized to the owning document node;
/// edges to targets that were never registered are ignored. A root that is
/// not itself a registered node reaches nothing.
pub fn find_orphans(graph: &LinkGraph, root: &str) -> Orphans {
    let mut dg: DiGraph<&str, ()> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();

    for node in graph.documents().iter().chain(graph.files().iter()) {
        index.insert(node.as_str(), dg.add_node(node.as_str()));
    }

    for (source, targets) in graph.edges() {
        let Some(&from) = index.get(source.as_str()) else {
            continue;
        };
        for target in targets {
            let node = uri::strip_fragment(target);
            if let Some(&to) = index.get(node) {
                dg.update_edge(from, to, ());
            }
        }
    }

    let mut reached: BTreeSet<&str> = BTreeSet::new();
    if let Some(&start) = index.get(root) {
        let mut bfs = Bfs::new(&dg, start);
        while let Some(nx) = bfs.next(&dg) {
            reached.insert(dg[nx]);
        }
    }

    Orphans {
        documents: graph
            .documents()
            .iter()
            .filter(|u| !reached.contains(u.as_str()))
            .cloned()
            .collect(),
        files: graph
            .files()
            .iter()
            .filter(|u| !reached.contains(u.as_str()))
            .cloned()
            .collect(),
    }
}

/// Drop every orphan URI matching `pattern`.
pub fn filter_out_orphans(orphans: Orphans, pattern: &Regex) -> Orphans {
    Orphans {
        documents: orphans
            .documents
            .into_iter()
            .filter(|u| !pattern.is_match(u))
            .collect(),
        files: orphans
            .files
            .into_iter()
            .filter(|u| !pattern.is_match(u))
            .collect(),
    }
}

/// Compile the orphan ignore pattern: the configuration resource is always
/// excluded, unioned with the user-supplied fragment when non-empty.
pub fn ignore_pattern(user_fragment: &str) -> Result<Regex> {
    let mut pattern = format!("^{}$", regex::escape(CONFIG_URI));
    let user_fragment = user_fragment.trim();
    if !user_fragment.is_empty() {
        pattern.push('|');
        pattern.push_str(user_fragment);
    }
    Regex::new(&pattern).map_err(|e| Error::pattern_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_parser::parse;

    fn graph_with(docs: &[(&str, &str)], files: &[&str]) -> LinkGraph {
        let mut graph = LinkGraph::new();
        for (uri, source) in docs {
            graph.add_document(uri, &parse(source).body);
        }
        for uri in files {
            graph.add_file(uri);
        }
        graph
    }

    #[test]
    fn test_fully_reachable_graph_has_no_orphans() {
        let graph = graph_with(
            &[("/home", "[guide](/guide)\n"), ("/guide", "[back](/home)\n")],
            &[],
        );
        assert!(find_orphans(&graph, "/home").is_empty());
    }

    #[test]
    fn test_unreachable_document_is_orphan() {
        // /home -> /guide -> /img/logo.png; /old links nothing, linked from nowhere
        let graph = graph_with(
            &[
                ("/home", "[guide](/guide)\n"),
                ("/guide", "![logo](/img/logo.png)\n"),
                ("/old", "nothing here\n"),
            ],
            &["/img/logo.png"],
        );

        let orphans = find_orphans(&graph, "/home");
        assert_eq!(orphans.documents, BTreeSet::from(["/old".to_string()]));
        assert!(orphans.files.is_empty());
    }

    #[test]
    fn test_fragment_edge_reaches_owning_document() {
        let graph = graph_with(
            &[("/home", "[setup](/guide#setup)\n"), ("/guide", "text\n")],
            &[],
        );
        assert!(find_orphans(&graph, "/home").is_empty());
    }

    #[test]
    fn test_edge_to_unregistered_target_is_ignored() {
        let graph = graph_with(&[("/home", "[gone](/deleted)\n")], &[]);
        let orphans = find_orphans(&graph, "/home");
        assert!(orphans.is_empty());
    }

    #[test]
    fn test_root_missing_from_graph_orphans_everything() {
        let graph = graph_with(&[("/old", "text\n")], &["/file.bin"]);
        let orphans = find_orphans(&graph, "/home");
        assert_eq!(orphans.documents.len(), 1);
        assert_eq!(orphans.files.len(), 1);
    }

    #[test]
    fn test_filter_out_orphans_by_pattern() {
        let graph = graph_with(
            &[("/home", "text\n"), ("/drafts/wip", "text\n")],
            &["/site.yaml"],
        );
        let orphans = find_orphans(&graph, "/home");
        assert!(orphans.documents.contains("/drafts/wip"));

        let pattern = ignore_pattern("^/drafts/").unwrap();
        let filtered = filter_out_orphans(orphans, &pattern);
        assert!(filtered.documents.is_empty());
        // The configuration resource is always excluded
        assert!(filtered.files.is_empty());
    }

    #[test]
    fn test_ignore_pattern_rejects_bad_regex() {
        assert!(ignore_pattern("([unclosed").is_err());
    }

    #[test]
    fn test_ignored_document_stays_unreachable_but_unreported() {
        let graph = graph_with(&[("/home", "text\n"), ("/old", "text\n")], &[]);
        let orphans = find_orphans(&graph, "/home");
        let filtered = filter_out_orphans(orphans, &ignore_pattern("^/old$").unwrap());
        assert!(!filtered.documents.contains("/old"));
    }
}
