//! Taxonomy loading and validation.

use std::path::PathBuf;

use cryptoql_core::errors::{CryptoqlError, CryptoqlErrorCode, TaxonomyError, TaxonomyIssueKind};
use cryptoql_rules::taxonomy::{load_document, load_taxonomy, Taxonomy};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The JSON fixture loads with declaration order and resolved alternatives.
#[test]
fn test_load_json_fixture() {
    let taxonomy = load_taxonomy(&fixture("crypto_taxonomy.json")).unwrap();
    let categories: Vec<&str> = taxonomy.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(categories, vec!["Hash", "Cipher", "PKE"]);
    assert_eq!(taxonomy.subcategory_count(), 7);
    assert_eq!(taxonomy.modes(), &["cbc", "ecb", "ofb"]);
    assert_eq!(taxonomy.alternative_for("Hash", "SHA1"), Some("sha256"));
    assert_eq!(taxonomy.alternative_for("Cipher", "3DES"), Some("aes-256-gcm"));
    assert_eq!(taxonomy.alternative_for("Cipher", "AES"), Some("aes-256-gcm"));
    assert_eq!(taxonomy.alternative_for("PKE", "RSA"), Some("unspecified"));
}

/// TOML documents load the same way as JSON ones.
#[test]
fn test_load_toml_fixture() {
    let taxonomy = load_taxonomy(&fixture("crypto_taxonomy.toml")).unwrap();
    let md = taxonomy.subcategory("Hash", "MD").unwrap();
    assert_eq!(md.tokens, vec!["md5", "md4"]);
    assert_eq!(md.alternative, "sha256");
    assert_eq!(taxonomy.alternative_for("Cipher", "3DES"), Some("aes-256-gcm"));
    assert_eq!(taxonomy.modes(), &["ecb"]);
}

/// A document and its JSON serialization validate to the same taxonomy.
#[test]
fn test_document_json_roundtrip() {
    let doc = load_document(&fixture("crypto_taxonomy.json")).unwrap();
    let json = doc.to_json_pretty().unwrap();
    let a = Taxonomy::from_document(&doc).unwrap();
    let b = Taxonomy::from_json_str(&json).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

/// Unsupported extensions are configuration errors.
#[test]
fn test_unknown_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.yaml");
    std::fs::write(&path, "algorithms: {}").unwrap();
    let err = load_taxonomy(&path).unwrap_err();
    assert!(matches!(err, CryptoqlError::Config(_)));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

/// A missing file is an I/O error naming the path.
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match load_taxonomy(&path).unwrap_err() {
        CryptoqlError::Taxonomy(TaxonomyError::Io { path: p, .. }) => {
            assert!(p.ends_with("absent.json"));
        }
        other => panic!("expected Io, got {other:?}"),
    }
}

/// Parse errors name the file, not the format.
#[test]
fn test_parse_error_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"algorithms": {"Hash": "#).unwrap();
    let err = load_taxonomy(&path).unwrap_err();
    assert_eq!(err.error_code(), "TAXONOMY_PARSE");
    assert!(err.to_string().contains("broken.json"));
}

/// Every invalid path is reported in one error.
#[test]
fn test_aggregated_validation_error() {
    let json = r#"{
      "algorithms": {
        "Hash": { "MD": [], "SHA1": ["sha1", "SHA1"] },
        "Cipher": { "DES": ["des"] },
        "Empty": {}
      },
      "modes": { "block": ["ecb", ""] },
      "alternatives": {
        "Cipher": { "DES": "@Cipher/Nowhere" },
        "Ghost": { "X": "aes" }
      },
      "default_alternatives": { "Empty": "aes" }
    }"#;
    let err = Taxonomy::from_json_str(json).unwrap_err();
    assert_eq!(err.error_code(), "TAXONOMY_INVALID");

    let found: Vec<(&str, &TaxonomyIssueKind)> =
        err.issues().iter().map(|i| (i.path.as_str(), &i.kind)).collect();
    assert_eq!(
        found,
        vec![
            ("Hash/MD", &TaxonomyIssueKind::EmptyTokens),
            ("Hash/SHA1", &TaxonomyIssueKind::DuplicateToken { token: "sha1".into() }),
            ("alternatives/Ghost/X", &TaxonomyIssueKind::UnknownAlternativePath),
            ("default_alternatives/Empty", &TaxonomyIssueKind::UnknownAlternativePath),
            (
                "Cipher/DES",
                &TaxonomyIssueKind::MissingAlternativeTarget { target: "Cipher/Nowhere".into() }
            ),
            ("modes/block", &TaxonomyIssueKind::BlankToken),
        ]
    );
    let message = err.to_string();
    assert!(message.starts_with("Invalid taxonomy (6 issue(s))"));
    assert!(message.contains("Hash/MD: no tokens"));
}

/// An empty document is a valid, empty taxonomy.
#[test]
fn test_empty_document() {
    let taxonomy = Taxonomy::from_json_str("{}").unwrap();
    assert!(taxonomy.is_empty());
    assert_eq!(taxonomy.fingerprint(), Taxonomy::empty().fingerprint());
}
