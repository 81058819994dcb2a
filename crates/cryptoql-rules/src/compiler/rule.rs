//! Compiled rules.

use std::sync::Arc;

use serde::Serialize;

use cryptoql_core::Surface;

use crate::boundary::{Anchor, Matcher};

/// What a rule recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// One taxonomy subcategory.
    Algorithm,
    /// One operation-mode token, always `SAFE`.
    Mode,
    /// Two algorithm tokens in one candidate.
    Concatenated,
}

/// One immutable rule: a label plus the matcher deciding it.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    surface: Surface,
    kind: RuleKind,
    category: String,
    subcategory: String,
    alternative: String,
    tokens: Vec<String>,
    patterns: Vec<String>,
    matcher: Arc<dyn Matcher>,
}

impl CompiledRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surface: Surface,
        kind: RuleKind,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        alternative: impl Into<String>,
        tokens: Vec<String>,
        patterns: Vec<String>,
        matcher: Arc<dyn Matcher>,
    ) -> Self {
        Self {
            surface,
            kind,
            category: category.into(),
            subcategory: subcategory.into(),
            alternative: alternative.into(),
            tokens,
            patterns,
            matcher,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    /// Canonical tokens the rule was built from. Empty for the
    /// concatenation rule.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Regex sources of the matcher, one per naming convention.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    pub fn test(&self, candidate: &str) -> bool {
        self.matcher.test(candidate)
    }

    pub fn anchor(&self, candidate: &str) -> Option<Anchor> {
        self.matcher.anchor(candidate)
    }

    /// `category/subcategory`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.category, self.subcategory)
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            surface: self.surface,
            kind: self.kind,
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            alternative: self.alternative.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Serializable view of a rule, without its matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub surface: Surface,
    pub kind: RuleKind,
    pub category: String,
    pub subcategory: String,
    pub alternative: String,
    pub tokens: Vec<String>,
}
