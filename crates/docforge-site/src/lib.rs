//! # Docforge Site
//!
//! The build pipeline: repository, link resolution, HTML emission and the
//! single-pass site builder.
//!
//! A build walks the input tree once. Files are copied through verbatim;
//! every `.txt` source is parsed (once, via the shared cache), rendered to a
//! page with links resolved against the rest of the site, and registered in
//! the link graph. Orphan detection runs after the walk. Per-file problems
//! degrade into report entries; only an unreadable input root or invalid
//! configuration aborts a build.

mod build;
mod emitter;
mod repository;
mod resolver;

pub use build::{BuildReport, SiteBuilder};
pub use emitter::{EmittedPage, HtmlEmitter};
pub use repository::{DirRepository, DocCache, DocRepository};
pub use resolver::TargetResolver;
