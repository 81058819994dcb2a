//! Top-level error aggregating the subsystem errors.

use super::error_code::CryptoqlErrorCode;
use super::{CompileError, ConfigError, RenderError, TaxonomyError};

/// Any failure surfaced by a cryptoql entry point.
#[derive(Debug, thiserror::Error)]
pub enum CryptoqlError {
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl CryptoqlErrorCode for CryptoqlError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Taxonomy(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Compile(e) => e.error_code(),
            Self::Render(e) => e.error_code(),
        }
    }
}
