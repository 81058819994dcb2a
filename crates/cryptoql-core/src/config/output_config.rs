//! Rendered query output configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_QUERY_ID_PREFIX, DEFAULT_QUERY_LANGUAGE};

/// Where and how rendered queries are written.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory. Default: `generated_ql_queries`.
    pub directory: Option<String>,
    /// Prefix of each query `@id`. Default: `cpp/primitives`.
    pub query_id_prefix: Option<String>,
    /// Query language. Default and only supported value: `cpp`.
    pub language: Option<String>,
}

impl OutputConfig {
    pub fn effective_directory(&self) -> &str {
        self.directory.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    pub fn effective_query_id_prefix(&self) -> &str {
        self.query_id_prefix
            .as_deref()
            .unwrap_or(DEFAULT_QUERY_ID_PREFIX)
    }

    pub fn effective_language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_QUERY_LANGUAGE)
    }
}
