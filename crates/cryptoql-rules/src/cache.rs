//! In-memory cache of compiled rule sets using moka.
//!
//! Keyed by taxonomy fingerprint, so an edited taxonomy can never be served
//! a stale rule set.

use std::sync::Arc;

use moka::sync::Cache;

use cryptoql_core::constants::DEFAULT_CACHE_CAPACITY;
use cryptoql_core::errors::CompileError;
use cryptoql_core::Surface;

use crate::compiler::{compile_with, CompileOptions, RuleSet};
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    surface: Surface,
    include_modes: bool,
}

/// Compiled rule sets by `(fingerprint, surface, options)`.
pub struct RuleSetCache {
    cache: Cache<CacheKey, Arc<RuleSet>>,
}

impl RuleSetCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Return the cached rule set or compile and cache it.
    pub fn get_or_compile(
        &self,
        taxonomy: &Taxonomy,
        surface: Surface,
        options: CompileOptions,
    ) -> Result<Arc<RuleSet>, CompileError> {
        let key = CacheKey {
            fingerprint: taxonomy.fingerprint(),
            surface,
            include_modes: options.include_modes,
        };
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(surface = %surface, fingerprint = key.fingerprint, "Rule set cache hit");
            return Ok(hit);
        }
        let compiled = Arc::new(compile_with(taxonomy, surface, options)?);
        self.cache.insert(key, compiled.clone());
        Ok(compiled)
    }

    /// Drop every entry. Call when the taxonomy source is reloaded.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleSetCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
