//! Taxonomy store: category -> subcategory -> ordered tokens, plus the
//! alternative map and the flattened mode-token set.

pub mod alternatives;
pub mod document;
pub mod loader;
pub mod store;

pub use alternatives::{is_unspecified, AlternativeMap};
pub use document::{OrderedMap, TaxonomyDocument};
pub use loader::{load_document, load_taxonomy, TaxonomyFormat};
pub use store::{Category, Subcategory, Taxonomy, TaxonomyBuilder};
