//! Taxonomy validation errors.
//!
//! Validation never stops at the first problem: every offending path is
//! collected into one `TaxonomyError::Invalid` so a taxonomy author can fix
//! everything in a single pass.

use std::fmt;

use super::error_code::{self, CryptoqlErrorCode};

/// What is wrong with a single taxonomy path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyIssueKind {
    /// A subcategory declares no tokens.
    EmptyTokens,
    /// A token is empty or whitespace only.
    BlankToken,
    /// The same token appears twice in one subcategory (case-insensitive).
    DuplicateToken { token: String },
    /// An alternative is declared for a path that has no tokens.
    UnknownAlternativePath,
    /// An `@reference` alternative points at a path that does not exist.
    MissingAlternativeTarget { target: String },
    /// `@reference` alternatives form a cycle.
    CyclicAlternative { cycle: Vec<String> },
}

/// One validation problem, located by its `category/subcategory` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyIssue {
    pub path: String,
    pub kind: TaxonomyIssueKind,
}

impl TaxonomyIssue {
    pub fn new(path: impl Into<String>, kind: TaxonomyIssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for TaxonomyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TaxonomyIssueKind::EmptyTokens => write!(f, "{}: no tokens", self.path),
            TaxonomyIssueKind::BlankToken => write!(f, "{}: blank token", self.path),
            TaxonomyIssueKind::DuplicateToken { token } => {
                write!(f, "{}: duplicate token '{token}'", self.path)
            }
            TaxonomyIssueKind::UnknownAlternativePath => {
                write!(f, "{}: alternative declared for unknown path", self.path)
            }
            TaxonomyIssueKind::MissingAlternativeTarget { target } => {
                write!(f, "{}: alternative references missing path '{target}'", self.path)
            }
            TaxonomyIssueKind::CyclicAlternative { cycle } => {
                write!(f, "{}: cyclic alternative reference {}", self.path, cycle.join(" -> "))
            }
        }
    }
}

/// Errors that can occur while loading or validating a taxonomy document.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    #[error("Invalid taxonomy ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
    Invalid { issues: Vec<TaxonomyIssue> },

    #[error("Taxonomy parse error in {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Taxonomy file not readable: {path}: {message}")]
    Io { path: String, message: String },
}

impl TaxonomyError {
    /// The collected validation issues, empty for parse and I/O failures.
    pub fn issues(&self) -> &[TaxonomyIssue] {
        match self {
            Self::Invalid { issues } => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[TaxonomyIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CryptoqlErrorCode for TaxonomyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => error_code::TAXONOMY_INVALID,
            Self::Parse { .. } => error_code::TAXONOMY_PARSE,
            Self::Io { .. } => error_code::TAXONOMY_IO,
        }
    }
}
