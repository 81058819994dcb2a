//! Variant expansion: alternate spellings of a canonical token.
//!
//! A `<letters><digits>` token such as `sha256` also matches `sha-256` and
//! `sha_256`, and once a family has shown a digit-bearing base, any numeric
//! suffix of that base (`sha512`, `sha_3`) belongs to the family too.

use std::fmt;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::boundary::CaseForm;

/// Separator class allowed between a base and its numeric suffix.
const SEPARATOR_CLASS: &str = "[-_]?";

/// One matchable unit produced by the expander.
///
/// Fragments are pattern fragments, not literal strings: `Numbered` and
/// `AnyNumber` carry an optional separator and `AnyNumber` matches any
/// digit run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// The token itself, matched verbatim.
    Literal(String),
    /// `<base>[-_]?<digits>`.
    Numbered { base: String, digits: String },
    /// `<base>[-_]?[0-9]+`.
    AnyNumber { base: String },
}

impl Fragment {
    /// Regex source for this fragment in the given case form.
    pub fn pattern(&self, case: CaseForm) -> String {
        match self {
            Self::Literal(text) => regex::escape(&case.apply(text)),
            Self::Numbered { base, digits } => {
                format!("{}{SEPARATOR_CLASS}{digits}", regex::escape(&case.apply(base)))
            }
            Self::AnyNumber { base } => {
                format!("{}{SEPARATOR_CLASS}[0-9]+", regex::escape(&case.apply(base)))
            }
        }
    }

    /// Length of the shortest text this fragment can match, in chars.
    /// Longer fragments go first in alternations.
    pub fn min_len(&self) -> usize {
        match self {
            Self::Literal(text) => text.chars().count(),
            Self::Numbered { base, digits } => base.chars().count() + digits.len(),
            Self::AnyNumber { base } => base.chars().count() + 1,
        }
    }

    /// True for fragments naming one concrete spelling family.
    pub fn is_exact(&self) -> bool {
        !matches!(self, Self::AnyNumber { .. })
    }

    /// Concrete lowercase spellings this fragment stands for. `AnyNumber`
    /// stands for infinitely many and yields none.
    pub fn spellings(&self) -> SmallVec<[String; 3]> {
        match self {
            Self::Literal(text) => SmallVec::from_iter([text.clone()]),
            Self::Numbered { base, digits } => SmallVec::from_iter([
                format!("{base}{digits}"),
                format!("{base}-{digits}"),
                format!("{base}_{digits}"),
            ]),
            Self::AnyNumber { .. } => SmallVec::new(),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern(CaseForm::Lower))
    }
}

/// Split `<letters><digits>` into its parts. Letters are ASCII lowercase.
pub fn split_numbered(token: &str) -> Option<(&str, &str)> {
    let split = token.find(|c: char| c.is_ascii_digit())?;
    let (base, digits) = token.split_at(split);
    let valid = !base.is_empty()
        && base.chars().all(|c| c.is_ascii_lowercase())
        && digits.chars().all(|c| c.is_ascii_digit());
    valid.then_some((base, digits))
}

/// The derived variants of one token family, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenVariantSet {
    fragments: Vec<Fragment>,
    digit_bases: Vec<String>,
}

impl TokenVariantSet {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Bases seen with a numeric suffix, in discovery order.
    pub fn digit_bases(&self) -> &[String] {
        &self.digit_bases
    }

    pub fn contains(&self, fragment: &Fragment) -> bool {
        self.fragments.contains(fragment)
    }

    /// All concrete spellings, deduplicated, in discovery order.
    pub fn spellings(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.fragments
            .iter()
            .flat_map(Fragment::spellings)
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    /// Fragments ordered for alternation: longest first, then by pattern
    /// text, so a short token never shadows a longer one sharing its prefix
    /// and the order never depends on discovery order.
    pub fn alternation_order(&self) -> Vec<&Fragment> {
        let mut ordered: Vec<&Fragment> = self.fragments.iter().collect();
        ordered.sort_by(|a, b| {
            b.min_len()
                .cmp(&a.min_len())
                .then_with(|| b.is_exact().cmp(&a.is_exact()))
                .then_with(|| a.pattern(CaseForm::Lower).cmp(&b.pattern(CaseForm::Lower)))
        });
        ordered
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Accumulates the tokens of one family and emits its variant set.
#[derive(Debug, Default)]
pub struct VariantExpander {
    set: TokenVariantSet,
    seen: FxHashSet<Fragment>,
}

impl VariantExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand one token of the family.
    pub fn push(&mut self, token: &str) {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return;
        }
        if let Some((base, digits)) = split_numbered(&token) {
            let numbered = Fragment::Numbered {
                base: base.to_string(),
                digits: digits.to_string(),
            };
            if !self.set.digit_bases.iter().any(|b| b == base) {
                self.set.digit_bases.push(base.to_string());
            }
            self.add(Fragment::Literal(token.clone()));
            self.add(numbered);
        } else {
            self.add(Fragment::Literal(token));
        }
    }

    /// Close the family: every digit-bearing base also matches any suffix.
    pub fn finish(mut self) -> TokenVariantSet {
        let bases = self.set.digit_bases.clone();
        for base in bases {
            self.add(Fragment::AnyNumber { base });
        }
        self.set
    }

    fn add(&mut self, fragment: Fragment) {
        if self.seen.insert(fragment.clone()) {
            self.set.fragments.push(fragment);
        }
    }
}

/// Expand a single token as a family of one.
pub fn expand(token: &str) -> TokenVariantSet {
    expand_family([token])
}

/// Expand every token of a family together.
pub fn expand_family<I, S>(tokens: I) -> TokenVariantSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expander = VariantExpander::new();
    for token in tokens {
        expander.push(token.as_ref());
    }
    expander.finish()
}
