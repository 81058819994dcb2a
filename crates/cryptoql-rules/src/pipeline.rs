//! Config-driven entry points: load, compile, write.

use std::path::PathBuf;
use std::sync::Arc;

use cryptoql_core::config::CryptoqlConfig;
use cryptoql_core::errors::{ConfigError, CryptoqlError};
use cryptoql_core::Surface;

use crate::cache::RuleSetCache;
use crate::compiler::{CompileOptions, RuleSet};
use crate::render::{write_queries, QueryRenderer};
use crate::taxonomy::{load_taxonomy, Taxonomy};

/// One configured compiler with its rule-set cache.
pub struct Pipeline {
    config: CryptoqlConfig,
    cache: RuleSetCache,
    renderer: QueryRenderer,
}

impl Pipeline {
    pub fn new(config: CryptoqlConfig) -> Self {
        let cache = RuleSetCache::new(config.compile.effective_cache_capacity());
        let renderer = QueryRenderer::new(
            config.output.effective_query_id_prefix(),
            config.output.effective_language(),
        );
        Self {
            config,
            cache,
            renderer,
        }
    }

    pub fn config(&self) -> &CryptoqlConfig {
        &self.config
    }

    pub fn cache(&self) -> &RuleSetCache {
        &self.cache
    }

    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            include_modes: self.config.compile.effective_include_modes(),
        }
    }

    /// Load the taxonomy named by `taxonomy.path`.
    pub fn load_taxonomy(&self) -> Result<Taxonomy, CryptoqlError> {
        let path = self
            .config
            .taxonomy
            .path_buf()
            .ok_or_else(|| ConfigError::ValidationFailed {
                field: "taxonomy.path".to_string(),
                message: "no taxonomy file configured".to_string(),
            })?;
        load_taxonomy(&path)
    }

    /// Rule set for one surface, served from the cache when unchanged.
    pub fn rule_set(
        &self,
        taxonomy: &Taxonomy,
        surface: Surface,
    ) -> Result<Arc<RuleSet>, CryptoqlError> {
        Ok(self.cache.get_or_compile(taxonomy, surface, self.options())?)
    }

    /// Rule sets for every configured surface.
    pub fn compile(&self, taxonomy: &Taxonomy) -> Result<Vec<Arc<RuleSet>>, CryptoqlError> {
        self.config
            .compile
            .effective_surfaces()
            .into_iter()
            .map(|surface| self.rule_set(taxonomy, surface))
            .collect()
    }

    /// Render rule sets into the configured output directory.
    pub fn write(&self, rule_sets: &[Arc<RuleSet>]) -> Result<Vec<PathBuf>, CryptoqlError> {
        let dir = PathBuf::from(self.config.output.effective_directory());
        Ok(write_queries(&dir, rule_sets, &self.renderer)?)
    }

    /// Load, compile and write in one go.
    pub fn run(&self) -> Result<Vec<PathBuf>, CryptoqlError> {
        let taxonomy = self.load_taxonomy()?;
        let rule_sets = self.compile(&taxonomy)?;
        self.write(&rule_sets)
    }
}
