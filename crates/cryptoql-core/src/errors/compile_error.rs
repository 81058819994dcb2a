//! Rule compilation errors.

use super::error_code::{self, CryptoqlErrorCode};

/// Errors raised while turning token fragments into matchers.
///
/// Fragments are escaped before assembly, so these indicate a bug or a
/// pathological taxonomy (e.g. one exceeding the regex size limit).
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Pattern for {path} failed to compile: {message}")]
    PatternFailed { path: String, message: String },

    #[error("Concatenation vocabulary failed to compile: {0}")]
    VocabularyFailed(String),
}

impl CryptoqlErrorCode for CompileError {
    fn error_code(&self) -> &'static str {
        error_code::COMPILE_ERROR
    }
}
