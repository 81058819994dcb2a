//! Shared constants for the cryptoql compiler.

/// cryptoql version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Alternative used when neither the subcategory nor its category name one.
pub const UNSPECIFIED_ALTERNATIVE: &str = "unspecified";

/// Alternative forced onto every operation-mode rule.
pub const SAFE_ALTERNATIVE: &str = "SAFE";

/// Category and subcategory label of the concatenation rule.
pub const CONCATENATED_LABEL: &str = "Concatenated";

/// Category label shared by all operation-mode rules.
pub const MODE_CATEGORY: &str = "Mode";

/// Prefix marking an alternative value as a reference to another path.
pub const ALTERNATIVE_REFERENCE_PREFIX: char = '@';

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "cryptoql.toml";

/// Default directory for rendered query files.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_ql_queries";

/// Default prefix for the `@id` of rendered queries.
pub const DEFAULT_QUERY_ID_PREFIX: &str = "cpp/primitives";

/// Default query language. Only `cpp` is rendered.
pub const DEFAULT_QUERY_LANGUAGE: &str = "cpp";

/// Default number of compiled rule sets kept by the cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 32;

/// Default fallback filter when `CRYPTOQL_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "cryptoql=info";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CRYPTOQL_LOG";
