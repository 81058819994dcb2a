//! Rule compiler and precedence resolver.

pub mod compile;
pub mod rule;
pub mod rule_set;

pub use compile::{compile, compile_all, compile_surfaces, compile_with, CompileOptions};
pub use rule::{CompiledRule, RuleKind, RuleSummary};
pub use rule_set::{Classification, ClassificationReport, RuleSet};
