//! Declaration tree: the node model, source extents, the syntax-tree visitor
//! that builds nodes, and predicate queries over the result.

pub mod extent;
pub mod node;
pub mod query;
pub mod visitor;

pub use extent::{Extent, ExtentError, SourceFile, SourceMap};
pub use node::{Node, NodeKind};
pub use query::Walk;
pub use visitor::traverse;
