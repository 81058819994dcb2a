//! Tests for the cryptoql error handling system.

use cryptoql_core::errors::error_code::{self, CryptoqlErrorCode};
use cryptoql_core::errors::*;

/// Every error enum reports a non-empty error code.
#[test]
fn test_all_errors_have_error_code() {
    let taxonomy = TaxonomyError::Invalid { issues: vec![] };
    assert_eq!(taxonomy.error_code(), error_code::TAXONOMY_INVALID);

    let parse = TaxonomyError::Parse {
        source_name: "t.json".into(),
        message: "eof".into(),
    };
    assert_eq!(parse.error_code(), error_code::TAXONOMY_PARSE);

    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert!(!config.error_code().is_empty());

    let compile = CompileError::VocabularyFailed("too big".into());
    assert!(!compile.error_code().is_empty());

    let render = RenderError::WriteFile {
        path: "q.ql".into(),
        message: "denied".into(),
    };
    assert!(!render.error_code().is_empty());
}

/// Subsystem errors convert into the top-level error and keep their code.
#[test]
fn test_from_conversions_keep_codes() {
    let err: CryptoqlError = ConfigError::ValidationFailed {
        field: "compile.surfaces".into(),
        message: "bad".into(),
    }
    .into();
    assert!(matches!(err, CryptoqlError::Config(_)));
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);

    let err: CryptoqlError = TaxonomyError::Invalid { issues: vec![] }.into();
    assert_eq!(err.error_code(), error_code::TAXONOMY_INVALID);
}

/// The aggregated taxonomy error lists every offending path.
#[test]
fn test_taxonomy_error_lists_all_paths() {
    let err = TaxonomyError::Invalid {
        issues: vec![
            TaxonomyIssue::new("Hash/MD", TaxonomyIssueKind::EmptyTokens),
            TaxonomyIssue::new(
                "Cipher/DES",
                TaxonomyIssueKind::DuplicateToken { token: "des".into() },
            ),
            TaxonomyIssue::new(
                "Cipher/RC",
                TaxonomyIssueKind::CyclicAlternative {
                    cycle: vec!["Cipher/RC".into(), "Cipher/DES".into(), "Cipher/RC".into()],
                },
            ),
        ],
    };
    let msg = err.to_string();
    assert!(msg.contains("3 issue(s)"), "{msg}");
    assert!(msg.contains("Hash/MD: no tokens"), "{msg}");
    assert!(msg.contains("Cipher/DES: duplicate token 'des'"), "{msg}");
    assert!(msg.contains("Cipher/RC -> Cipher/DES -> Cipher/RC"), "{msg}");
    assert_eq!(err.issues().len(), 3);
}

/// The coded string carries the code in brackets.
#[test]
fn test_coded_string_format() {
    let err = ConfigError::InvalidValue {
        field: "taxonomy.path".into(),
        message: "unsupported extension".into(),
    };
    assert!(err.coded_string().starts_with("[CONFIG_ERROR] "));
}
