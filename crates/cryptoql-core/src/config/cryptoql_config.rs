//! Top-level cryptoql configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CompileConfig, OutputConfig, TaxonomyConfig};
use crate::constants::{DEFAULT_QUERY_LANGUAGE, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;
use crate::types::Surface;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CRYPTOQL_*`)
/// 3. Project config (`cryptoql.toml` in project root)
/// 4. User config (`~/.cryptoql/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CryptoqlConfig {
    pub taxonomy: TaxonomyConfig,
    pub compile: CompileConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub taxonomy_path: Option<String>,
    pub output_dir: Option<String>,
    pub surfaces: Vec<String>,
    pub include_modes: Option<bool>,
}

impl CryptoqlConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CryptoqlConfig) -> Result<(), ConfigError> {
        for name in &config.compile.surfaces {
            if Surface::parse_str(name).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "compile.surfaces".to_string(),
                    message: format!(
                        "unknown surface '{name}' (expected function_name, macro_name or argument)"
                    ),
                });
            }
        }
        if config.compile.cache_capacity == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "compile.cache_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(prefix) = &config.output.query_id_prefix {
            if prefix.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "output.query_id_prefix".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if let Some(language) = &config.output.language {
            if language != DEFAULT_QUERY_LANGUAGE {
                return Err(ConfigError::ValidationFailed {
                    field: "output.language".to_string(),
                    message: format!("unsupported language '{language}', only 'cpp' is rendered"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.cryptoql/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CryptoqlConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CryptoqlConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it sets a value.
    fn merge(base: &mut CryptoqlConfig, other: &CryptoqlConfig) {
        if other.taxonomy.path.is_some() {
            base.taxonomy.path = other.taxonomy.path.clone();
        }

        if !other.compile.surfaces.is_empty() {
            base.compile.surfaces = other.compile.surfaces.clone();
        }
        if other.compile.include_modes.is_some() {
            base.compile.include_modes = other.compile.include_modes;
        }
        if other.compile.cache_capacity.is_some() {
            base.compile.cache_capacity = other.compile.cache_capacity;
        }

        if other.output.directory.is_some() {
            base.output.directory = other.output.directory.clone();
        }
        if other.output.query_id_prefix.is_some() {
            base.output.query_id_prefix = other.output.query_id_prefix.clone();
        }
        if other.output.language.is_some() {
            base.output.language = other.output.language.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CRYPTOQL_TAXONOMY_PATH`, `CRYPTOQL_COMPILE_SURFACES`, etc.
    fn apply_env_overrides(config: &mut CryptoqlConfig) {
        if let Ok(val) = std::env::var("CRYPTOQL_TAXONOMY_PATH") {
            config.taxonomy.path = Some(val);
        }
        if let Ok(val) = std::env::var("CRYPTOQL_COMPILE_SURFACES") {
            config.compile.surfaces = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(val) = std::env::var("CRYPTOQL_COMPILE_INCLUDE_MODES") {
            if let Ok(v) = val.parse::<bool>() {
                config.compile.include_modes = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CRYPTOQL_COMPILE_CACHE_CAPACITY") {
            if let Ok(v) = val.parse::<u64>() {
                config.compile.cache_capacity = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CRYPTOQL_OUTPUT_DIR") {
            config.output.directory = Some(val);
        }
        if let Ok(val) = std::env::var("CRYPTOQL_OUTPUT_QUERY_ID_PREFIX") {
            config.output.query_id_prefix = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CryptoqlConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.taxonomy_path {
            config.taxonomy.path = Some(v.clone());
        }
        if let Some(ref v) = cli.output_dir {
            config.output.directory = Some(v.clone());
        }
        if !cli.surfaces.is_empty() {
            config.compile.surfaces = cli.surfaces.clone();
        }
        if let Some(v) = cli.include_modes {
            config.compile.include_modes = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.cryptoql/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".cryptoql"))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
