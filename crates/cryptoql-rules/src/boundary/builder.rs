//! Boundary-pattern builder.
//!
//! Each convention is one regex of the shape `{left}({token alternation}){right}`.
//! The regex engine has no lookaround, so the boundary characters are
//! consumed instead. That is sound because every question asked of these
//! regexes is "does a match exist", and `captures_at` still sees the text
//! before its start position when evaluating `^`.

use regex::{Regex, RegexSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::case_form::CaseForm;
use super::matcher::{Anchor, Matcher};
use crate::variants::TokenVariantSet;

/// Start, non-alphanumeric, or a digit followed by a separator.
const LEFT_PLAIN: &str = "(?:^|[^A-Za-z0-9]|[0-9][-_])";
/// As `LEFT_PLAIN`, plus a lowercase letter (`aesECB`, `getAes`).
const LEFT_AFTER_LOWER: &str = "(?:^|[^A-Za-z0-9]|[0-9][-_]|[a-z])";
/// As `LEFT_AFTER_LOWER`, plus an uppercase letter (`HMACSha1`).
const LEFT_CAPITALIZED: &str = "(?:^|[^A-Za-z0-9]|[0-9][-_]|[a-zA-Z])";
/// Anything but a digit glued to the token, which would make it part of a
/// digit-led token (`3desKey` is not `des`).
const LEFT_NOT_DIGIT: &str = "(?:^|[^0-9])";
/// End or non-letter.
const RIGHT_NON_LETTER: &str = "(?:[^A-Za-z]|$)";
/// End or anything but a lowercase letter.
const RIGHT_NON_LOWER: &str = "(?:[^a-z]|$)";

/// One naming convention under which a token is a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    /// `des_encrypt`, `evp-md5`, `x86_md5`.
    SnakeKebab,
    /// `desEncrypt`, `getrsaKey`: lowercase token ending where a camel word
    /// starts, wherever it begins.
    CamelLower,
    /// `AESkey`, `XAESkey`: all-caps token glued to a lowercase run.
    UpperGlued,
    /// `AES_KEY`, `MD5Init`, `aesECB`: all-caps token ending at a
    /// non-letter, the end, or the start of a capitalized word.
    UpperWord,
    /// `getAesKey`, `Sha256`: one PascalCase segment.
    Capitalized,
    /// `AESecb`: lowercase token right after an uppercase letter.
    LowerAfterUpper,
}

impl Convention {
    pub fn all() -> &'static [Convention] {
        &[
            Self::SnakeKebab,
            Self::CamelLower,
            Self::UpperGlued,
            Self::UpperWord,
            Self::Capitalized,
            Self::LowerAfterUpper,
        ]
    }

    pub fn case_form(&self) -> CaseForm {
        match self {
            Self::SnakeKebab | Self::CamelLower | Self::LowerAfterUpper => CaseForm::Lower,
            Self::UpperGlued | Self::UpperWord => CaseForm::Upper,
            Self::Capitalized => CaseForm::Capitalized,
        }
    }

    fn left(&self) -> &'static str {
        match self {
            Self::SnakeKebab => LEFT_PLAIN,
            Self::CamelLower | Self::UpperGlued => LEFT_NOT_DIGIT,
            Self::UpperWord => LEFT_AFTER_LOWER,
            Self::Capitalized => LEFT_CAPITALIZED,
            Self::LowerAfterUpper => "[A-Z]",
        }
    }

    fn right(&self) -> &'static str {
        match self {
            Self::SnakeKebab => RIGHT_NON_LETTER,
            Self::CamelLower => "[A-Z]",
            Self::UpperGlued => "[a-z]",
            Self::UpperWord => "(?:[^A-Za-z]|$|[A-Z][a-z])",
            Self::Capitalized | Self::LowerAfterUpper => RIGHT_NON_LOWER,
        }
    }

    /// Regex source for this convention over an alternation body.
    pub fn wrap(&self, alternation: &str) -> String {
        format!("{}({}){}", self.left(), alternation, self.right())
    }
}

/// A compiled convention regex. Capture group 1 is the token.
#[derive(Debug, Clone)]
pub struct ConventionPattern {
    convention: Convention,
    regex: Regex,
}

impl ConventionPattern {
    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// Longest token occurrence of this convention in `candidate`.
    ///
    /// Scans every start position instead of `captures_iter`, whose
    /// non-overlapping matches would hide a token whose left boundary was
    /// consumed by the previous match.
    fn longest_token(&self, candidate: &str) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut pos = 0;
        while pos <= candidate.len() {
            let Some(caps) = self.regex.captures_at(candidate, pos) else {
                break;
            };
            let Some(token) = caps.get(1) else {
                break;
            };
            if best.map_or(true, |(s, e)| token.len() > e - s) {
                best = Some((token.start(), token.end()));
            }
            let step = candidate[token.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            pos = token.start() + step;
        }
        best
    }
}

/// Union of every convention pattern for one token family.
#[derive(Debug, Clone)]
pub struct BoundaryMatcher {
    set: RegexSet,
    patterns: Vec<ConventionPattern>,
    exact_spellings: FxHashSet<String>,
}

impl BoundaryMatcher {
    /// Build over all case forms.
    pub fn build(variants: &TokenVariantSet) -> Result<Self, regex::Error> {
        Self::build_with_cases(variants, CaseForm::all())
    }

    /// Build using only the conventions whose case form is listed.
    pub fn build_with_cases(
        variants: &TokenVariantSet,
        case_forms: &[CaseForm],
    ) -> Result<Self, regex::Error> {
        let ordered = variants.alternation_order();
        let mut patterns = Vec::new();

        if !ordered.is_empty() {
            for convention in Convention::all() {
                let case = convention.case_form();
                if !case_forms.contains(&case) {
                    continue;
                }
                let mut alternatives: Vec<String> =
                    ordered.iter().map(|f| f.pattern(case)).collect();
                // Case forms can collapse distinct fragments (e.g. digits only).
                let mut seen = FxHashSet::default();
                alternatives.retain(|a| seen.insert(a.clone()));
                let regex = Regex::new(&convention.wrap(&alternatives.join("|")))?;
                patterns.push(ConventionPattern {
                    convention: *convention,
                    regex,
                });
            }
        }

        let set = RegexSet::new(patterns.iter().map(|p| p.source()))?;
        let exact_spellings = variants.spellings().into_iter().collect();

        Ok(Self {
            set,
            patterns,
            exact_spellings,
        })
    }

    pub fn patterns(&self) -> &[ConventionPattern] {
        &self.patterns
    }

    /// Regex sources, one per convention, in convention order.
    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(ConventionPattern::source).collect()
    }

    /// Conventions that fire on `candidate`.
    pub fn conventions_matching(&self, candidate: &str) -> Vec<Convention> {
        self.set
            .matches(candidate)
            .into_iter()
            .map(|idx| self.patterns[idx].convention)
            .collect()
    }
}

impl Matcher for BoundaryMatcher {
    fn test(&self, candidate: &str) -> bool {
        self.set.is_match(candidate)
    }

    fn anchor(&self, candidate: &str) -> Option<Anchor> {
        let mut best: Option<Anchor> = None;
        for idx in self.set.matches(candidate).into_iter() {
            let Some((start, end)) = self.patterns[idx].longest_token(candidate) else {
                continue;
            };
            let exact = self
                .exact_spellings
                .contains(&candidate[start..end].to_lowercase());
            let anchor = Anchor { start, end, exact };
            if best.map_or(true, |b| anchor.strength() > b.strength()) {
                best = Some(anchor);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::{expand, expand_family};

    fn matcher(tokens: &[&str]) -> BoundaryMatcher {
        BoundaryMatcher::build(&expand_family(tokens.iter().copied())).unwrap()
    }

    #[test]
    fn snake_and_kebab() {
        let m = matcher(&["md5"]);
        assert!(m.test("md5"));
        assert!(m.test("evp_md5"));
        assert!(m.test("evp-md-5-digest"));
        assert!(m.test("x86_md5"));
        assert!(!m.test("cmd5"));
    }

    #[test]
    fn camel_and_pascal() {
        let m = matcher(&["aes"]);
        assert!(m.test("aesEncrypt"));
        assert!(m.test("getAesKey"));
        assert!(m.test("AesCipher"));
        assert!(m.test("AES_set_key"));
        assert!(m.test("AESKey"));
        assert!(m.test("AESkey"));
        assert!(!m.test("caesar"));
        assert!(!m.test("aesthetic"));
    }

    #[test]
    fn camel_glued_tokens_mid_identifier() {
        let rsa = matcher(&["rsa"]);
        assert!(rsa.test("getrsaKey"));
        assert_eq!(
            rsa.conventions_matching("getrsaKey"),
            vec![Convention::CamelLower]
        );
        let aes = matcher(&["aes"]);
        assert!(aes.test("encryptaesKey"));
        assert!(aes.test("XAESkey"));
        assert!(aes.conventions_matching("XAESkey").contains(&Convention::UpperGlued));
        assert!(!aes.test("caesarShift"));
        let des = matcher(&["des"]);
        assert!(!des.test("run3desKey"));
        assert!(!des.test("RUN3DESkey"));
    }

    #[test]
    fn directional_transitions() {
        let ecb = matcher(&["ecb"]);
        assert!(ecb.test("aesECB"));
        assert!(ecb.test("AESecb"));
        assert!(
            ecb.conventions_matching("aesECB").contains(&Convention::UpperWord)
        );
        assert!(
            ecb.conventions_matching("AESecb").contains(&Convention::LowerAfterUpper)
        );
    }

    #[test]
    fn substring_of_longer_word_is_rejected() {
        let m = matcher(&["md"]);
        assert!(!m.test("amendment"));
        assert!(!m.test("Amendment"));
        assert!(m.test("md_init"));
    }

    #[test]
    fn generic_suffix_matches_unseen_numbers() {
        let m = matcher(&["sha256"]);
        assert!(m.test("sha512_update"));
        assert!(m.test("SHA-1"));
        let anchor = m.anchor("sha512_update").unwrap();
        assert!(!anchor.exact);
        assert_eq!(anchor.text("sha512_update"), "sha512");
        let anchor = m.anchor("Sha_256Final").unwrap();
        assert!(anchor.exact);
        assert_eq!(anchor.text("Sha_256Final"), "Sha_256");
    }

    #[test]
    fn longest_alternative_is_captured() {
        let m = matcher(&["des", "desx"]);
        let anchor = m.anchor("run_desx").unwrap();
        assert_eq!(anchor.text("run_desx"), "desx");
    }

    #[test]
    fn case_forms_restrict_conventions() {
        let m = BoundaryMatcher::build_with_cases(&expand("aes"), &[CaseForm::Lower]).unwrap();
        assert!(m.test("aes_key"));
        assert!(!m.test("AES_KEY"));
        assert_eq!(m.patterns().len(), 3);
    }

    #[test]
    fn empty_family_never_matches() {
        let m = BoundaryMatcher::build(&TokenVariantSet::default()).unwrap();
        assert!(!m.test(""));
        assert!(!m.test("anything"));
        assert!(m.anchor("anything").is_none());
    }

    #[test]
    fn total_on_odd_input() {
        let m = matcher(&["aes"]);
        assert!(!m.test(""));
        assert!(m.test("ключ_aes_🔑"));
        assert!(m.anchor("ключ_aes_🔑").is_some());
        assert!(!m.test("\u{0}\u{ffff}"));
    }
}
