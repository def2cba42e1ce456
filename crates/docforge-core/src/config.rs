//! Site configuration.
//!
//! A flat key-value file (`site.yaml`) at a well-known path under the input
//! root. A missing file means defaults; a malformed file is a configuration
//! error.

use crate::error::{Error, Result};
use crate::uri::CONFIG_FILE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site-wide configuration loaded from `<input root>/site.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Regex fragment for orphan URIs to ignore, default empty
    pub ignore_orphans: String,
    /// Root document URI for reachability, default `/home`
    pub root: String,
    /// Optional stylesheet href injected into every page
    pub extra_styles: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            ignore_orphans: String::new(),
            root: "/home".to_string(),
            extra_styles: String::new(),
        }
    }
}

impl SiteConfig {
    /// Load the configuration from the input root, falling back to defaults
    /// when the file does not exist.
    pub fn load(input_root: &Path) -> Result<Self> {
        let path = input_root.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(Error::io)?;
        let config: SiteConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::config_error(format!("Invalid {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.root.starts_with('/') {
            return Err(Error::config_error(format!(
                "root must be an absolute URI starting with '/': {}",
                self.root
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = SiteConfig::load(temp.path()).unwrap();
        assert_eq!(config.root, "/home");
        assert!(config.ignore_orphans.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE),
            "ignore_orphans: \"^/drafts/\"\nroot: /index\n",
        )
        .unwrap();

        let config = SiteConfig::load(temp.path()).unwrap();
        assert_eq!(config.ignore_orphans, "^/drafts/");
        assert_eq!(config.root, "/index");
    }

    #[test]
    fn test_relative_root_rejected() {
        let config = SiteConfig {
            root: "home".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
