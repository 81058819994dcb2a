//! Rule sets and the precedence resolver.

use rayon::prelude::*;
use serde::Serialize;

use cryptoql_core::Surface;

use super::rule::{CompiledRule, RuleKind, RuleSummary};
use crate::boundary::Anchor;

/// The winning rule for one candidate.
#[derive(Debug, Clone)]
pub struct Classification<'r> {
    pub rule: &'r CompiledRule,
    /// Token text that anchored the decision.
    pub matched: String,
}

impl Classification<'_> {
    pub fn report(&self, candidate: &str) -> ClassificationReport {
        ClassificationReport {
            candidate: candidate.to_string(),
            category: self.rule.category().to_string(),
            subcategory: self.rule.subcategory().to_string(),
            alternative: self.rule.alternative().to_string(),
            matched: self.matched.clone(),
        }
    }
}

/// Owned, serializable classification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub candidate: String,
    pub category: String,
    pub subcategory: String,
    pub alternative: String,
    pub matched: String,
}

/// All rules compiled for one surface from one taxonomy version.
///
/// Immutable and `Send + Sync`; classification is a pure function.
#[derive(Debug, Clone)]
pub struct RuleSet {
    surface: Surface,
    fingerprint: u64,
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new(surface: Surface, fingerprint: u64, rules: Vec<CompiledRule>) -> Self {
        Self {
            surface,
            fingerprint,
            rules,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Fingerprint of the taxonomy the rules were compiled from.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Rules in declaration order: subcategories, modes, then the
    /// concatenation rule.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules.iter().map(CompiledRule::summary).collect()
    }

    /// Every rule whose matcher fires, in declaration order.
    pub fn matching_rules(&self, candidate: &str) -> Vec<&CompiledRule> {
        self.rules.iter().filter(|r| r.test(candidate)).collect()
    }

    /// Pick the rule that classifies `candidate`.
    ///
    /// A firing concatenation rule wins outright. Otherwise the rule with
    /// the longest matched token wins, an exact token beating a generic
    /// numeric one of the same length, and remaining ties go to the rule
    /// declared first. The exact-over-generic step refines plain
    /// declaration order on purpose: `sha256` should beat a family's
    /// `sha[0-9]+` fallback declared earlier.
    pub fn classify(&self, candidate: &str) -> Option<Classification<'_>> {
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.kind() == RuleKind::Concatenated && r.test(candidate))
        {
            let matched = rule
                .anchor(candidate)
                .map_or(candidate, |a| a.text(candidate));
            return Some(Classification {
                rule,
                matched: matched.to_string(),
            });
        }

        let mut best: Option<(&CompiledRule, Anchor)> = None;
        for rule in &self.rules {
            if rule.kind() == RuleKind::Concatenated || !rule.test(candidate) {
                continue;
            }
            let anchor = rule.anchor(candidate).unwrap_or(Anchor {
                start: 0,
                end: 0,
                exact: false,
            });
            if best.map_or(true, |(_, b)| anchor.strength() > b.strength()) {
                best = Some((rule, anchor));
            }
        }

        best.map(|(rule, anchor)| Classification {
            rule,
            matched: anchor.text(candidate).to_string(),
        })
    }

    /// Classify many candidates in parallel. Output order is input order.
    pub fn classify_batch<S>(&self, candidates: &[S]) -> Vec<Option<Classification<'_>>>
    where
        S: AsRef<str> + Sync,
    {
        candidates
            .par_iter()
            .map(|c| self.classify(c.as_ref()))
            .collect()
    }
}
