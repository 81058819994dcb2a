//! Concatenation detector.
//!
//! An identifier naming two algorithms at once (`aes_rsa_combo`,
//! `md5_sha1_update`) is not evidence of either one in isolation. The
//! detector fires on two disjoint vocabulary occurrences separated by at
//! least one non-alphanumeric character or digit run, and every subcategory
//! rule is guarded by its negation.

use std::sync::Arc;

use regex::Regex;

use crate::boundary::{Anchor, CaseForm, Matcher};
use crate::variants::{expand_family, TokenVariantSet};

/// Between the two occurrences: optional digits/separators and letters, then
/// at least one non-alphanumeric character or digit.
const GAP: &str = "[-_0-9]*[a-z]*(?:[^a-z0-9]|[0-9])+";

/// Regex for a non-empty vocabulary. The first occurrence starts the
/// candidate, follows a non-letter, or starts a camel word after a lowercase
/// letter (`encryptAES_RSA`). Capture group 1 or 2 spans both occurrences.
fn detector_source(vocabulary: &str, camel_starts: &str) -> String {
    let mut source = format!("(?i)(?:^|[^a-z])((?:{vocabulary}){GAP}(?:{vocabulary}))");
    if !camel_starts.is_empty() {
        source.push_str(&format!(
            "|(?-i:[a-z])((?-i:{camel_starts}){GAP}(?:{vocabulary}))"
        ));
    }
    source
}

/// Fires when a candidate names two vocabulary tokens.
///
/// Built from algorithm tokens only. Operation modes are not vocabulary, so
/// `encrypt_3des_ecb` is a single algorithm plus a mode.
#[derive(Debug, Clone)]
pub struct ConcatenationDetector {
    /// `None` for an empty vocabulary, which never fires.
    regex: Option<Regex>,
}

impl ConcatenationDetector {
    pub fn new(vocabulary: &TokenVariantSet) -> Result<Self, regex::Error> {
        if vocabulary.is_empty() {
            return Ok(Self { regex: None });
        }
        let ordered = vocabulary.alternation_order();
        let alternation = ordered
            .iter()
            .map(|f| f.pattern(CaseForm::Lower))
            .collect::<Vec<_>>()
            .join("|");
        // Only letter-initial fragments can open a camel word.
        let camel_starts = ordered
            .iter()
            .filter(|f| f.pattern(CaseForm::Lower).starts_with(|c: char| c.is_ascii_alphabetic()))
            .flat_map(|f| [f.pattern(CaseForm::Upper), f.pattern(CaseForm::Capitalized)])
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&detector_source(&alternation, &camel_starts))?;
        Ok(Self { regex: Some(regex) })
    }

    /// Build over the expansion of `tokens` taken as one family.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(&expand_family(tokens))
    }

    pub fn is_concatenated(&self, candidate: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(candidate))
    }

    /// Regex source, `None` when the vocabulary is empty.
    pub fn source(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }
}

impl Matcher for ConcatenationDetector {
    fn test(&self, candidate: &str) -> bool {
        self.is_concatenated(candidate)
    }

    fn anchor(&self, candidate: &str) -> Option<Anchor> {
        let caps = self.regex.as_ref()?.captures(candidate)?;
        let span = caps.get(1).or_else(|| caps.get(2))?;
        Some(Anchor {
            start: span.start(),
            end: span.end(),
            exact: true,
        })
    }
}

/// A subcategory matcher that refuses concatenated candidates.
#[derive(Debug, Clone)]
pub struct GuardedMatcher<M> {
    guard: Arc<ConcatenationDetector>,
    inner: M,
}

impl<M: Matcher> GuardedMatcher<M> {
    pub fn new(guard: Arc<ConcatenationDetector>, inner: M) -> Self {
        Self { guard, inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: Matcher> Matcher for GuardedMatcher<M> {
    fn test(&self, candidate: &str) -> bool {
        !self.guard.is_concatenated(candidate) && self.inner.test(candidate)
    }

    fn anchor(&self, candidate: &str) -> Option<Anchor> {
        if self.guard.is_concatenated(candidate) {
            return None;
        }
        self.inner.anchor(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryMatcher;
    use crate::variants::expand;

    fn detector() -> ConcatenationDetector {
        ConcatenationDetector::from_tokens(["aes", "rsa", "md5", "sha1", "des", "3des"]).unwrap()
    }

    #[test]
    fn two_algorithms_are_concatenated() {
        let d = detector();
        assert!(d.is_concatenated("aes_rsa_combo"));
        assert!(d.is_concatenated("MD5_SHA1_Update"));
        assert!(d.is_concatenated("rsa-with-aes"));
        assert!(d.is_concatenated("aes256rsa"));
    }

    #[test]
    fn single_algorithm_is_not() {
        let d = detector();
        assert!(!d.is_concatenated("encrypt_3des_ecb"));
        assert!(!d.is_concatenated("aes_encrypt"));
        assert!(!d.is_concatenated("aesEncrypt"));
        assert!(!d.is_concatenated(""));
    }

    #[test]
    fn camel_word_can_open_a_pair() {
        let d = detector();
        assert!(d.is_concatenated("encryptAES_RSA"));
        assert!(d.is_concatenated("doAes_rsa_combo"));
        assert_eq!(d.anchor("doAes_rsa_combo").unwrap().text("doAes_rsa_combo"), "Aes_rsa");
        assert!(!d.is_concatenated("myaes_rsa"));
        assert!(!d.is_concatenated("getAesKey"));
    }

    #[test]
    fn glued_tokens_need_a_separator() {
        let d = detector();
        assert!(!d.is_concatenated("aesrsa"));
    }

    #[test]
    fn empty_vocabulary_never_fires() {
        let d = ConcatenationDetector::new(&TokenVariantSet::default()).unwrap();
        assert!(!d.is_concatenated("aes_rsa"));
        assert!(d.source().is_none());
        assert!(d.anchor("aes_rsa").is_none());
    }

    #[test]
    fn anchor_spans_both_tokens() {
        let d = detector();
        let anchor = d.anchor("do_aes_rsa_combo").unwrap();
        assert_eq!(anchor.text("do_aes_rsa_combo"), "aes_rsa");
    }

    #[test]
    fn guard_blocks_inner_matcher() {
        let guard = Arc::new(detector());
        let aes = GuardedMatcher::new(guard, BoundaryMatcher::build(&expand("aes")).unwrap());
        assert!(aes.test("aes_encrypt"));
        assert!(!aes.test("aes_rsa_combo"));
        assert!(aes.anchor("aes_rsa_combo").is_none());
        assert!(aes.inner().test("aes_rsa_combo"));
    }
}
