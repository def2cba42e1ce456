//! # Docforge Core
//!
//! Core data models, error types, configuration and URI handling for the
//! docforge static site generator. This crate defines the canonical types
//! that all other crates depend on.
//!
//! ## Core Modules
//!
//! - [`models`] - Parsed document tree (ParsedDocument, Block, Inline, DocError)
//! - [`error`] - Error type and Result alias
//! - [`config`] - Site configuration (`site.yaml`)
//! - [`uri`] - Logical URI convention and link classification

pub mod config;
pub mod error;
pub mod models;
pub mod uri;

pub use config::SiteConfig;
pub use error::{Error, Result};
pub use models::{
    Block, DocError, ErrorKind, Inline, LineIndex, ParsedDocument, plain_text,
};
pub use uri::{DocTarget, LinkTarget};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SiteConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Block, DocError, ErrorKind, Inline, LineIndex, ParsedDocument, plain_text,
    };
    pub use crate::uri::{self, DocTarget, LinkTarget};
}
