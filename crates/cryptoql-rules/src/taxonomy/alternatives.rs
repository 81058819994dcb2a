//! Alternative-recommendation lookup.
//!
//! Resolution: the subcategory's own alternative unless absent or the
//! `unspecified` sentinel, then the category default, then the literal
//! `unspecified`. A value `@Category/Subcategory` or `@Category` borrows the
//! resolved alternative of another path.

use cryptoql_core::constants::{ALTERNATIVE_REFERENCE_PREFIX, UNSPECIFIED_ALTERNATIVE};
use cryptoql_core::errors::TaxonomyIssueKind;

use super::document::OrderedMap;

/// Returns true for values that mean "no recommendation".
pub fn is_unspecified(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(UNSPECIFIED_ALTERNATIVE)
}

/// A lookup node: either a category default or a subcategory override.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Category(String),
    Subcategory(String, String),
}

impl Node {
    fn path(&self) -> String {
        match self {
            Self::Category(c) => c.clone(),
            Self::Subcategory(c, s) => format!("{c}/{s}"),
        }
    }

    fn parse_reference(value: &str) -> Option<Self> {
        let target = value.trim().strip_prefix(ALTERNATIVE_REFERENCE_PREFIX)?;
        Some(match target.split_once('/') {
            Some((c, s)) => Self::Subcategory(c.trim().to_string(), s.trim().to_string()),
            None => Self::Category(target.trim().to_string()),
        })
    }
}

/// Read-only alternative map, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct AlternativeMap {
    by_category: OrderedMap<Option<String>>,
    by_path: OrderedMap<OrderedMap<Option<String>>>,
}

impl AlternativeMap {
    pub fn new(
        by_category: OrderedMap<Option<String>>,
        by_path: OrderedMap<OrderedMap<Option<String>>>,
    ) -> Self {
        Self {
            by_category,
            by_path,
        }
    }

    /// Raw category default, before sentinel handling and references.
    pub fn category_default(&self, category: &str) -> Option<&str> {
        self.by_category.get(category).and_then(|v| v.as_deref())
    }

    /// Raw subcategory override, before sentinel handling and references.
    pub fn subcategory_override(&self, category: &str, subcategory: &str) -> Option<&str> {
        self.by_path
            .get(category)
            .and_then(|subs| subs.get(subcategory))
            .and_then(|v| v.as_deref())
    }

    /// Every category that declares a default.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys()
    }

    /// Every `(category, subcategory)` that declares an override.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path
            .iter()
            .flat_map(|(c, subs)| subs.keys().map(move |s| (c, s)))
    }

    /// Resolve the alternative for a subcategory.
    ///
    /// `known` answers whether a `(category, Some(subcategory))` or
    /// `(category, None)` reference target exists. Errors carry the issue
    /// to report against the path being resolved.
    pub fn resolve<F>(
        &self,
        category: &str,
        subcategory: &str,
        known: F,
    ) -> Result<String, TaxonomyIssueKind>
    where
        F: Fn(&str, Option<&str>) -> bool,
    {
        let mut stack = Vec::new();
        self.resolve_node(
            &Node::Subcategory(category.to_string(), subcategory.to_string()),
            &known,
            &mut stack,
        )
    }

    fn resolve_node<F>(
        &self,
        node: &Node,
        known: &F,
        stack: &mut Vec<Node>,
    ) -> Result<String, TaxonomyIssueKind>
    where
        F: Fn(&str, Option<&str>) -> bool,
    {
        if let Some(pos) = stack.iter().position(|n| n == node) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(Node::path).collect();
            cycle.push(node.path());
            return Err(TaxonomyIssueKind::CyclicAlternative { cycle });
        }
        stack.push(node.clone());

        let (own, fallback) = match node {
            Node::Subcategory(c, s) => (
                self.subcategory_override(c, s),
                Some(Node::Category(c.clone())),
            ),
            Node::Category(c) => (self.category_default(c), None),
        };

        let result = match own.filter(|v| !is_unspecified(v)) {
            Some(value) => match Node::parse_reference(value) {
                Some(target) => {
                    let exists = match &target {
                        Node::Category(c) => known(c, None),
                        Node::Subcategory(c, s) => known(c, Some(s.as_str())),
                    };
                    if !exists {
                        Err(TaxonomyIssueKind::MissingAlternativeTarget {
                            target: target.path(),
                        })
                    } else {
                        self.resolve_node(&target, known, stack)
                    }
                }
                None => Ok(value.trim().to_string()),
            },
            None => match fallback {
                Some(parent) => self.resolve_node(&parent, known, stack),
                None => Ok(UNSPECIFIED_ALTERNATIVE.to_string()),
            },
        };

        stack.pop();
        result
    }
}
