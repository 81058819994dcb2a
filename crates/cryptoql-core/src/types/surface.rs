//! Detection surfaces: the places an algorithm token can appear in source code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a candidate string was extracted from.
///
/// Matching semantics are identical across surfaces; only the extraction
/// done by the downstream engine differs, so each surface gets its own
/// self-contained rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Name of a called function.
    FunctionName,
    /// Name of an invoked macro.
    MacroName,
    /// String literal passed as a call argument.
    Argument,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionName => "function_name",
            Self::MacroName => "macro_name",
            Self::Argument => "argument",
        }
    }

    /// Parse a surface name. Accepts the snake_case name and a short alias.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "function_name" | "function" | "call" | "calls" => Some(Self::FunctionName),
            "macro_name" | "macro" | "macros" => Some(Self::MacroName),
            "argument" | "arg" | "args" => Some(Self::Argument),
            _ => None,
        }
    }

    pub fn all() -> &'static [Surface] {
        &[Self::FunctionName, Self::MacroName, Self::Argument]
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
