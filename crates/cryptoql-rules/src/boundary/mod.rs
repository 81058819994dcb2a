//! Boundary-safe matching of tokens inside identifiers.
//!
//! A token only counts when it stands as a lexical unit under some naming
//! convention (snake_case, kebab-case, camelCase, PascalCase, SCREAMING
//! acronyms). The matcher is the union of all conventions.

pub mod builder;
pub mod case_form;
pub mod matcher;

pub use builder::{BoundaryMatcher, Convention, ConventionPattern};
pub use case_form::CaseForm;
pub use matcher::{Anchor, Matcher};
