//! Surface case forms of a token.

use serde::{Deserialize, Serialize};

/// How a token is cased where it appears in an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseForm {
    /// `aes`
    Lower,
    /// `AES`
    Upper,
    /// `Aes`; the first letter is raised even when digits precede it (`3Des`).
    Capitalized,
}

impl CaseForm {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Lower => text.to_lowercase(),
            Self::Upper => text.to_uppercase(),
            Self::Capitalized => {
                let lower = text.to_lowercase();
                let mut out = String::with_capacity(lower.len());
                let mut raised = false;
                for c in lower.chars() {
                    if !raised && c.is_alphabetic() {
                        out.extend(c.to_uppercase());
                        raised = true;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }

    pub fn all() -> &'static [CaseForm] {
        &[Self::Lower, Self::Upper, Self::Capitalized]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalized_raises_first_letter_only() {
        assert_eq!(CaseForm::Capitalized.apply("AES"), "Aes");
        assert_eq!(CaseForm::Capitalized.apply("3des"), "3Des");
        assert_eq!(CaseForm::Capitalized.apply("sha-256"), "Sha-256");
        assert_eq!(CaseForm::Capitalized.apply("42"), "42");
    }

    #[test]
    fn upper_and_lower() {
        assert_eq!(CaseForm::Upper.apply("rc4"), "RC4");
        assert_eq!(CaseForm::Lower.apply("RC4"), "rc4");
    }
}
