//! Anchor extraction.
//!
//! Every heading defines a fragment target named by its slug. Extraction is
//! a pure function over a parsed body; the repository wraps it behind the
//! "absent vs empty" anchor-set contract.

use docforge_core::models::Block;
use std::collections::HashSet;

/// Turn heading text into an anchor slug: lowercase, alphanumeric runs
/// joined by single dashes.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Collect every fragment identifier defined inside a document body.
///
/// An empty set is a real answer: a document with no headings defines no
/// anchors. "Document missing" is expressed by the caller, never here.
pub fn extract_anchors(body: &[Block]) -> HashSet<String> {
    let mut anchors = HashSet::new();
    collect(body, &mut anchors);
    anchors
}

fn collect(blocks: &[Block], anchors: &mut HashSet<String>) {
    for block in blocks {
        match block {
            Block::Heading { anchor, .. } => {
                if !anchor.is_empty() {
                    anchors.insert(anchor.clone());
                }
            }
            Block::BlockQuote(inner) => collect(inner, anchors),
            Block::List { items, .. } => {
                for item in items {
                    collect(item, anchors);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  Setup & Install!  "), "setup-install");
        assert_eq!(slugify("already-sluggish"), "already-sluggish");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_extract_anchors_from_headings() {
        let doc = parse("# Intro\n\n## Deep Dive\n\n> ## Quoted Heading\n");
        let anchors = extract_anchors(&doc.body);
        assert!(anchors.contains("intro"));
        assert!(anchors.contains("deep-dive"));
        assert!(anchors.contains("quoted-heading"));
        assert_eq!(anchors.len(), 3);
    }

    #[test]
    fn test_no_headings_yields_empty_set() {
        let doc = parse("plain paragraph, no headings\n");
        assert!(extract_anchors(&doc.body).is_empty());
    }
}
