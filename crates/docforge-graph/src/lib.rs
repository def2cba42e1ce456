//! # Docforge Graph
//!
//! Site link graph and orphan detection.
//!
//! [`LinkGraph`] accumulates every document, plain file and link target as
//! the site tree is walked. After the walk, [`find_orphans`] computes the
//! reachability closure from the configured root and reports every node the
//! closure misses; [`filter_out_orphans`] then drops the URIs the operator
//! asked to ignore.

mod graph;
mod orphans;

pub use graph::LinkGraph;
pub use orphans::{Orphans, filter_out_orphans, find_orphans, ignore_pattern};
