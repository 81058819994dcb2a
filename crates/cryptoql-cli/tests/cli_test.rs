//! End-to-end tests of the `cryptoql` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../cryptoql-rules/tests/fixtures/crypto_taxonomy.json")
}

/// Run the binary from an empty project root with no user config.
fn cryptoql(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cryptoql"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env("HOME", root)
        .env_remove("CRYPTOQL_TAXONOMY_PATH")
        .env_remove("CRYPTOQL_OUTPUT_DIR")
        .env_remove("CRYPTOQL_COMPILE_SURFACES")
        .env("CRYPTOQL_LOG", "off")
        .output()
        .unwrap()
}

/// `check` accepts a valid taxonomy.
#[test]
fn test_check_valid() {
    let dir = tempfile::tempdir().unwrap();
    let out = cryptoql(dir.path(), &["check", "--taxonomy", fixture().to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ok (3 categories, 7 subcategories, 3 modes"));
}

/// `check` lists every issue and exits 1.
#[test]
fn test_check_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"algorithms": {"Hash": {"MD": [], "SHA1": ["sha1", "sha1"]}}}"#).unwrap();
    let out = cryptoql(dir.path(), &["check", "--taxonomy", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("[TAXONOMY_INVALID]"));
    assert!(stderr.contains("  - Hash/MD: no tokens"));
    assert!(stderr.contains("  - Hash/SHA1: duplicate token 'sha1'"));
}

/// `compile` writes the query files it prints.
#[test]
fn test_compile_writes_queries() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("queries");
    let out = cryptoql(
        dir.path(),
        &[
            "--json",
            "compile",
            "--taxonomy",
            fixture().to_str().unwrap(),
            "--out",
            out_dir.to_str().unwrap(),
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let paths: Vec<String> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(paths.len(), 4);
    assert!(out_dir.join("query_regexp_calls.ql").exists());
    assert!(out_dir.join("query_noargs.ql").exists());
}

/// `classify` prints one line per identifier.
#[test]
fn test_classify_lines() {
    let dir = tempfile::tempdir().unwrap();
    let out = cryptoql(
        dir.path(),
        &[
            "classify",
            "--taxonomy",
            fixture().to_str().unwrap(),
            "encrypt_3des_ecb",
            "aes_rsa_combo",
            "main",
        ],
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "encrypt_3des_ecb\tCipher/3DES\taes-256-gcm\t3des",
            "aes_rsa_combo\tConcatenated/Concatenated\tunspecified\taes_rsa",
            "main\t-",
        ]
    );
}

/// An unknown surface is a configuration error.
#[test]
fn test_classify_unknown_surface() {
    let dir = tempfile::tempdir().unwrap();
    let out = cryptoql(
        dir.path(),
        &["classify", "--taxonomy", fixture().to_str().unwrap(), "--surface", "variable", "x"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("[CONFIG_ERROR]"));
}
