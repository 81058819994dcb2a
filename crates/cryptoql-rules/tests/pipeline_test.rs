//! Config-driven load, compile and write.

use std::path::PathBuf;
use std::sync::Arc;

use cryptoql_core::config::CryptoqlConfig;
use cryptoql_core::errors::CryptoqlError;
use cryptoql_core::Surface;
use cryptoql_rules::compiler::RuleKind;
use cryptoql_rules::Pipeline;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn config(extra: &str, out: &std::path::Path) -> CryptoqlConfig {
    let toml = format!(
        "[taxonomy]\npath = {:?}\n\n[output]\ndirectory = {:?}\n\n{extra}",
        fixture("crypto_taxonomy.json"),
        out.display().to_string()
    );
    CryptoqlConfig::from_toml(&toml).unwrap()
}

/// A full run writes one query per surface plus the exact-name query.
#[test]
fn test_run_writes_all_queries() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(config("", dir.path()));
    let written = pipeline.run().unwrap();
    assert_eq!(written.len(), 4);
    assert!(written.iter().all(|p| p.starts_with(dir.path())));
}

/// Configured surfaces and mode switch are honored.
#[test]
fn test_configured_surfaces_and_modes() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(config(
        "[compile]\nsurfaces = [\"macro\"]\ninclude_modes = false\n",
        dir.path(),
    ));
    let taxonomy = pipeline.load_taxonomy().unwrap();
    let sets = pipeline.compile(&taxonomy).unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].surface(), Surface::MacroName);
    assert!(sets[0].rules().iter().all(|r| r.kind() != RuleKind::Mode));

    let written = pipeline.write(&sets).unwrap();
    assert_eq!(written.len(), 1);
}

/// Recompiling an unchanged taxonomy is served from the cache.
#[test]
fn test_pipeline_reuses_cached_rule_sets() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(config("", dir.path()));
    let taxonomy = pipeline.load_taxonomy().unwrap();
    let first = pipeline.rule_set(&taxonomy, Surface::Argument).unwrap();
    let second = pipeline.rule_set(&taxonomy, Surface::Argument).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

/// Without a taxonomy path there is nothing to load.
#[test]
fn test_missing_taxonomy_path() {
    let pipeline = Pipeline::new(CryptoqlConfig::default());
    let err = pipeline.load_taxonomy().unwrap_err();
    assert!(matches!(err, CryptoqlError::Config(_)));
}
