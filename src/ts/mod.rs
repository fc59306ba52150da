//! Tree-sitter integration for parsing Ruby sources.
//!
//! This is the parser collaborator of the outline builder: it turns source
//! text into a concrete syntax tree with row/column metadata and reports
//! malformed input as [`TreeSitterError`] syntax errors.

pub mod errors;
pub mod parser;

pub use errors::TreeSitterError;
pub use parser::{ErrorNode, ParsedTree, RubyParser};
