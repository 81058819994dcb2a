//! Rendering compiled rule sets as CodeQL queries.

pub mod codeql;
pub mod writer;

pub use codeql::{regexp_file_name, QueryRenderer, EXACT_NAME_FILE_NAME};
pub use writer::write_queries;
