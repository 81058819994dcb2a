//! Taxonomy source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the taxonomy document lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Path to a `.json` or `.toml` taxonomy document.
    pub path: Option<String>,
}

impl TaxonomyConfig {
    pub fn path_buf(&self) -> Option<PathBuf> {
        self.path.as_ref().map(PathBuf::from)
    }
}
