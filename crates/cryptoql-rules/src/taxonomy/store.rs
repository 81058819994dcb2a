//! Validated, read-only taxonomy.

use rustc_hash::FxHashSet;
use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use cryptoql_core::errors::{TaxonomyError, TaxonomyIssue, TaxonomyIssueKind};

use super::alternatives::AlternativeMap;
use super::document::{OrderedMap, TaxonomyDocument};

/// A named group of tokens sharing one alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    pub name: String,
    /// Lowercase, unique, in declaration order.
    pub tokens: Vec<String>,
    /// Resolved alternative, `unspecified` when none applies.
    pub alternative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

/// The algorithm taxonomy every compiler run reads from.
///
/// Built only through validation, so every subcategory has at least one
/// token and every alternative is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    categories: Vec<Category>,
    modes: Vec<String>,
    fingerprint: u64,
}

impl Taxonomy {
    /// A taxonomy with nothing in it. Compiles to an empty rule set.
    pub fn empty() -> Self {
        let mut taxonomy = Self {
            categories: Vec::new(),
            modes: Vec::new(),
            fingerprint: 0,
        };
        taxonomy.fingerprint = taxonomy.compute_fingerprint();
        taxonomy
    }

    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        Self::from_document(&TaxonomyDocument::from_json_str(json)?)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, TaxonomyError> {
        Self::from_document(&TaxonomyDocument::from_toml_str(toml_str)?)
    }

    /// Validate a raw document. Every problem found is reported at once.
    pub fn from_document(doc: &TaxonomyDocument) -> Result<Self, TaxonomyError> {
        let mut issues = Vec::new();

        // Pass 1: token lists.
        let mut pending: Vec<(String, Vec<(String, Vec<String>)>)> = Vec::new();
        for (category, subs) in doc.algorithms.iter() {
            if subs.is_empty() {
                tracing::warn!(category = %category, "Skipping empty category");
                continue;
            }
            let mut entries = Vec::with_capacity(subs.len());
            for (subcategory, raw_tokens) in subs.iter() {
                let path = format!("{category}/{subcategory}");
                let tokens = normalize_tokens(&path, raw_tokens, &mut issues);
                entries.push((subcategory.to_string(), tokens));
            }
            pending.push((category.to_string(), entries));
        }

        let category_known = |c: &str| pending.iter().any(|(name, _)| name == c);
        let path_known = |c: &str, s: &str| {
            pending
                .iter()
                .any(|(name, subs)| name == c && subs.iter().any(|(sub, _)| sub == s))
        };

        // Pass 2: alternatives must name declared paths.
        let alternatives =
            AlternativeMap::new(doc.default_alternatives.clone(), doc.alternatives.clone());
        for (category, subcategory) in alternatives.paths() {
            if !path_known(category, subcategory) {
                issues.push(TaxonomyIssue::new(
                    format!("alternatives/{category}/{subcategory}"),
                    TaxonomyIssueKind::UnknownAlternativePath,
                ));
            }
        }
        for category in alternatives.categories() {
            if !category_known(category) {
                issues.push(TaxonomyIssue::new(
                    format!("default_alternatives/{category}"),
                    TaxonomyIssueKind::UnknownAlternativePath,
                ));
            }
        }

        // Pass 3: resolve alternatives, following references.
        let known = |c: &str, s: Option<&str>| match s {
            Some(s) => path_known(c, s),
            None => category_known(c),
        };
        let mut categories = Vec::with_capacity(pending.len());
        for (category, entries) in &pending {
            let mut subcategories = Vec::with_capacity(entries.len());
            for (subcategory, tokens) in entries {
                let alternative = match alternatives.resolve(category, subcategory, &known) {
                    Ok(alternative) => alternative,
                    Err(kind) => {
                        issues.push(TaxonomyIssue::new(format!("{category}/{subcategory}"), kind));
                        continue;
                    }
                };
                subcategories.push(Subcategory {
                    name: subcategory.clone(),
                    tokens: tokens.clone(),
                    alternative,
                });
            }
            categories.push(Category {
                name: category.clone(),
                subcategories,
            });
        }

        let modes = normalize_modes(&doc.modes, &mut issues);

        if !issues.is_empty() {
            return Err(TaxonomyError::Invalid { issues });
        }

        let mut taxonomy = Self {
            categories,
            modes,
            fingerprint: 0,
        };
        taxonomy.fingerprint = taxonomy.compute_fingerprint();
        tracing::debug!(
            categories = taxonomy.categories.len(),
            subcategories = taxonomy.subcategory_count(),
            modes = taxonomy.modes.len(),
            fingerprint = taxonomy.fingerprint,
            "Taxonomy validated"
        );
        Ok(taxonomy)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Mode tokens, deduplicated, longest first then alphabetical.
    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    /// Content version of the taxonomy (xxh3-64 over its canonical form).
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Every `(category, subcategory)` in declaration order.
    pub fn subcategories(&self) -> impl Iterator<Item = (&Category, &Subcategory)> {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter().map(move |s| (c, s)))
    }

    pub fn subcategory(&self, category: &str, subcategory: &str) -> Option<&Subcategory> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .and_then(|c| c.subcategories.iter().find(|s| s.name == subcategory))
    }

    pub fn alternative_for(&self, category: &str, subcategory: &str) -> Option<&str> {
        self.subcategory(category, subcategory)
            .map(|s| s.alternative.as_str())
    }

    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }

    /// Every algorithm token across all subcategories, in declaration order,
    /// deduplicated.
    pub fn algorithm_tokens(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.subcategories()
            .flat_map(|(_, s)| s.tokens.iter().map(String::as_str))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.modes.is_empty()
    }

    fn compute_fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for category in &self.categories {
            hasher.update(b"C\0");
            hasher.update(category.name.as_bytes());
            for sub in &category.subcategories {
                hasher.update(b"\0S\0");
                hasher.update(sub.name.as_bytes());
                hasher.update(b"\0A\0");
                hasher.update(sub.alternative.as_bytes());
                for token in &sub.tokens {
                    hasher.update(b"\0T\0");
                    hasher.update(token.as_bytes());
                }
            }
            hasher.update(b"\0\n");
        }
        for mode in &self.modes {
            hasher.update(b"M\0");
            hasher.update(mode.as_bytes());
        }
        hasher.digest()
    }
}

fn normalize_tokens(path: &str, raw: &[String], issues: &mut Vec<TaxonomyIssue>) -> Vec<String> {
    if raw.is_empty() {
        issues.push(TaxonomyIssue::new(path, TaxonomyIssueKind::EmptyTokens));
        return Vec::new();
    }
    let mut seen = FxHashSet::default();
    let mut tokens = Vec::with_capacity(raw.len());
    for token in raw {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            issues.push(TaxonomyIssue::new(path, TaxonomyIssueKind::BlankToken));
            continue;
        }
        if !seen.insert(token.clone()) {
            issues.push(TaxonomyIssue::new(
                path,
                TaxonomyIssueKind::DuplicateToken { token },
            ));
            continue;
        }
        tokens.push(token);
    }
    tokens
}

/// Flatten mode families into one set, longest first then alphabetical.
fn normalize_modes(families: &OrderedMap<Vec<String>>, issues: &mut Vec<TaxonomyIssue>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut modes = Vec::new();
    for (family, tokens) in families.iter() {
        for token in tokens {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                issues.push(TaxonomyIssue::new(
                    format!("modes/{family}"),
                    TaxonomyIssueKind::BlankToken,
                ));
                continue;
            }
            if seen.insert(token.clone()) {
                modes.push(token);
            }
        }
    }
    modes.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    modes
}

/// Assembles a taxonomy in code. Used by tests, benches and embedders that
/// do not read a document from disk.
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    doc: TaxonomyDocument,
}

impl TaxonomyBuilder {
    pub fn subcategory<I, S>(mut self, category: &str, subcategory: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect();
        if !self.doc.algorithms.contains_key(category) {
            self.doc.algorithms.insert(category, OrderedMap::new());
        }
        if let Some(subs) = self.doc.algorithms.get_mut(category) {
            subs.insert(subcategory, tokens);
        }
        self
    }

    pub fn modes<I, S>(mut self, family: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc
            .modes
            .insert(family, tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn alternative(mut self, category: &str, subcategory: &str, value: &str) -> Self {
        if !self.doc.alternatives.contains_key(category) {
            self.doc.alternatives.insert(category, OrderedMap::new());
        }
        if let Some(subs) = self.doc.alternatives.get_mut(category) {
            subs.insert(subcategory, Some(value.to_string()));
        }
        self
    }

    pub fn default_alternative(mut self, category: &str, value: &str) -> Self {
        self.doc
            .default_alternatives
            .insert(category, Some(value.to_string()));
        self
    }

    pub fn document(&self) -> &TaxonomyDocument {
        &self.doc
    }

    pub fn build(self) -> Result<Taxonomy, TaxonomyError> {
        Taxonomy::from_document(&self.doc)
    }
}
