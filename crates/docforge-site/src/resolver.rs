//! Link target resolution against the repository.
//!
//! Answers the three questions emission needs about a classified target:
//! what to label it, whether it exists, and whether a resource is present.

use crate::repository::DocRepository;
use docforge_core::uri::DocTarget;
use std::collections::HashSet;

/// Resolver for document and resource targets, borrowed for one emission.
pub struct TargetResolver<'a> {
    repo: &'a dyn DocRepository,
}

impl<'a> TargetResolver<'a> {
    pub fn new(repo: &'a dyn DocRepository) -> Self {
        Self { repo }
    }

    /// Title of a target document. Internal fragments have no title of
    /// their own and never trigger a repository lookup.
    pub fn title(&self, target: &DocTarget) -> String {
        if target.internal {
            return String::new();
        }
        self.repo.title(&target.uri)
    }

    /// Human-readable label for a target, used when a link has no text of
    /// its own: title and fragment joined, degrading to whichever is
    /// present.
    pub fn label(&self, target: &DocTarget) -> String {
        let title = self.title(target);
        match &target.frag {
            Some(frag) if title.is_empty() => frag.clone(),
            Some(frag) => format!("{} - {}", title, frag),
            None => title,
        }
    }

    /// Whether a document target exists.
    ///
    /// An internal fragment is checked against the enclosing document's own
    /// anchors and never touches the repository. Otherwise the target
    /// document must be resolvable, and when a fragment is named it must be
    /// among the document's anchors.
    pub fn exists(&self, target: &DocTarget, own_anchors: &HashSet<String>) -> bool {
        if target.internal {
            return target
                .frag
                .as_ref()
                .is_some_and(|frag| own_anchors.contains(frag));
        }
        match self.repo.anchors(&target.uri) {
            Some(anchors) => match &target.frag {
                Some(frag) => anchors.contains(frag),
                None => true,
            },
            None => false,
        }
    }

    /// Whether a raw resource target exists.
    pub fn resource_exists(&self, resource_uri: &str) -> bool {
        self.repo.resource_exists(resource_uri)
    }
}
