//! Error handling for cryptoql.
//! One error enum per subsystem, `thiserror` only.

pub mod compile_error;
pub mod config_error;
pub mod cryptoql_error;
pub mod error_code;
pub mod render_error;
pub mod taxonomy_error;

pub use compile_error::CompileError;
pub use config_error::ConfigError;
pub use cryptoql_error::CryptoqlError;
pub use error_code::CryptoqlErrorCode;
pub use render_error::RenderError;
pub use taxonomy_error::{TaxonomyError, TaxonomyIssue, TaxonomyIssueKind};
