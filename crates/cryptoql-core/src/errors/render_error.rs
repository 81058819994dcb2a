//! Query rendering errors.

use super::error_code::{self, CryptoqlErrorCode};

/// Errors that can occur while writing rendered queries to disk.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot create output directory {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("Cannot write query file {path}: {message}")]
    WriteFile { path: String, message: String },
}

impl CryptoqlErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        error_code::RENDER_ERROR
    }
}
