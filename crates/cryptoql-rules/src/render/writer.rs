//! Writing rendered queries to disk.

use std::borrow::Borrow;
use std::path::{Path, PathBuf};

use cryptoql_core::errors::RenderError;
use cryptoql_core::Surface;

use super::codeql::{regexp_file_name, QueryRenderer, EXACT_NAME_FILE_NAME};
use crate::compiler::RuleSet;

/// Write one regexp query per rule set into `dir`, plus the exact-name
/// query when a function-name rule set is present. Returns the written
/// paths in write order.
pub fn write_queries<S: Borrow<RuleSet>>(
    dir: &Path,
    rule_sets: &[S],
    renderer: &QueryRenderer,
) -> Result<Vec<PathBuf>, RenderError> {
    std::fs::create_dir_all(dir).map_err(|e| RenderError::CreateDir {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut written = Vec::with_capacity(rule_sets.len() + 1);
    for set in rule_sets.iter().map(|s| Borrow::<RuleSet>::borrow(s)) {
        let path = dir.join(regexp_file_name(set.surface()));
        write_file(&path, &renderer.render(set))?;
        written.push(path);
    }

    if let Some(calls) = rule_sets
        .iter()
        .map(|s| Borrow::<RuleSet>::borrow(s))
        .find(|s| s.surface() == Surface::FunctionName)
    {
        let path = dir.join(EXACT_NAME_FILE_NAME);
        write_file(&path, &renderer.render_exact_names(calls))?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "Wrote queries");
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<(), RenderError> {
    std::fs::write(path, content).map_err(|e| RenderError::WriteFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote query file");
    Ok(())
}
