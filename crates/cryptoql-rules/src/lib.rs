//! # cryptoql-rules
//!
//! Compiles a taxonomy of cryptographic algorithm names into boundary-safe,
//! precedence-ordered matching rules for function names, macro names and
//! call arguments, and renders them as CodeQL queries.
//!
//! Data flow: taxonomy -> variant expander -> boundary-pattern builder ->
//! rule compiler, with the concatenation detector guarding every rule.

pub mod boundary;
pub mod cache;
pub mod compiler;
pub mod concat;
pub mod pipeline;
pub mod render;
pub mod taxonomy;
pub mod variants;

pub use boundary::{Anchor, BoundaryMatcher, CaseForm, Matcher};
pub use cache::RuleSetCache;
pub use compiler::{
    compile, compile_all, compile_with, Classification, CompileOptions, CompiledRule, RuleKind,
    RuleSet,
};
pub use concat::ConcatenationDetector;
pub use pipeline::Pipeline;
pub use taxonomy::{load_taxonomy, Taxonomy};
