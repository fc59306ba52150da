//! Ruby Outline: a structural map of Ruby source trees
//!
//! Scans a file or directory, parses each Ruby file with tree-sitter and
//! builds one declaration tree of modules, classes and methods, each with
//! its exact 1-indexed line extent in the originating file.
//!
//! # Architecture
//!
//! - [`ts`] wraps the tree-sitter Ruby grammar and reports malformed input.
//! - [`tree`] holds the [`Node`] model, [`Extent`] source resolution, the
//!   syntax-tree visitor and predicate queries.
//! - [`scan`] enumerates candidate files and merges each file's declarations
//!   under a single root. A file that fails to parse is reported and skipped.
//! - [`config`] loads scan settings (extensions, exclusion pattern) from TOML.
//!
//! # Example
//!
//! ```no_run
//! use ruby_outline::build_from_path;
//!
//! let outline = build_from_path("app/models")?;
//! for method in outline.root().find_by_name("call") {
//!     println!("{}", method);
//!     for (number, line) in method.source_lines_with_numbers()? {
//!         println!("{number:>5} {line}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod pool;
pub mod scan;
pub mod tree;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, OutlineConfig, ScanConfig};
pub use scan::{build_from_path, outline_source, Outline, ScanError, ScanFailure, Scanner};
pub use tree::{Extent, ExtentError, Node, NodeKind, SourceFile, SourceMap};
pub use ts::{RubyParser, TreeSitterError};
