//! CryptoqlErrorCode trait for the CLI boundary.

/// Every error enum implements this to provide a stable, machine-readable
/// code alongside its human-readable message.
pub trait CryptoqlErrorCode {
    /// Returns the error code string (e.g., "TAXONOMY_INVALID").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const TAXONOMY_INVALID: &str = "TAXONOMY_INVALID";
pub const TAXONOMY_PARSE: &str = "TAXONOMY_PARSE";
pub const TAXONOMY_IO: &str = "TAXONOMY_IO";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const COMPILE_ERROR: &str = "COMPILE_ERROR";
pub const RENDER_ERROR: &str = "RENDER_ERROR";
