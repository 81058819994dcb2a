//! Compilation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::types::Surface;

/// Configuration for the rule compiler.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompileConfig {
    /// Surfaces to compile. Empty means all three.
    pub surfaces: Vec<String>,
    /// Compile operation-mode rules. Default: true.
    pub include_modes: Option<bool>,
    /// Number of compiled rule sets the cache keeps. Default: 32.
    pub cache_capacity: Option<u64>,
}

impl CompileConfig {
    /// Returns the configured surfaces, all of them when none are listed.
    /// Unknown names are skipped here; `CryptoqlConfig::validate` rejects them.
    pub fn effective_surfaces(&self) -> Vec<Surface> {
        if self.surfaces.is_empty() {
            return Surface::all().to_vec();
        }
        let mut surfaces: Vec<Surface> = self
            .surfaces
            .iter()
            .filter_map(|s| Surface::parse_str(s))
            .collect();
        surfaces.sort();
        surfaces.dedup();
        surfaces
    }

    pub fn effective_include_modes(&self) -> bool {
        self.include_modes.unwrap_or(true)
    }

    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY)
    }
}
