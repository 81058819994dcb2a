//! Configuration system for cryptoql.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod compile_config;
pub mod cryptoql_config;
pub mod output_config;
pub mod taxonomy_config;

pub use compile_config::CompileConfig;
pub use cryptoql_config::{CliOverrides, CryptoqlConfig};
pub use output_config::OutputConfig;
pub use taxonomy_config::TaxonomyConfig;
