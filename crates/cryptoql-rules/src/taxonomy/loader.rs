//! Reading taxonomy documents from disk.

use std::path::Path;

use cryptoql_core::errors::{ConfigError, CryptoqlError, TaxonomyError};

use super::document::TaxonomyDocument;
use super::store::Taxonomy;

/// On-disk taxonomy formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyFormat {
    Json,
    Toml,
}

impl TaxonomyFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Read and parse a taxonomy document without validating it.
pub fn load_document(path: &Path) -> Result<TaxonomyDocument, CryptoqlError> {
    let format = TaxonomyFormat::from_path(path).ok_or_else(|| ConfigError::InvalidValue {
        field: "taxonomy.path".to_string(),
        message: format!("'{}' must end in .json or .toml", path.display()),
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let parsed = match format {
        TaxonomyFormat::Json => TaxonomyDocument::from_json_str(&content),
        TaxonomyFormat::Toml => TaxonomyDocument::from_toml_str(&content),
    };
    // Name the file instead of the format placeholder.
    parsed.map_err(|e| match e {
        TaxonomyError::Parse { message, .. } => CryptoqlError::from(TaxonomyError::Parse {
            source_name: path.display().to_string(),
            message,
        }),
        other => CryptoqlError::from(other),
    })
}

/// Read, parse and validate a taxonomy file.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, CryptoqlError> {
    let doc = load_document(path)?;
    let taxonomy = Taxonomy::from_document(&doc)?;
    tracing::info!(
        path = %path.display(),
        subcategories = taxonomy.subcategory_count(),
        modes = taxonomy.modes().len(),
        "Loaded taxonomy"
    );
    Ok(taxonomy)
}
