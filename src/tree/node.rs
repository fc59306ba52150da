use crate::tree::extent::{Extent, ExtentError};
use std::fmt;
use std::path::{Path, PathBuf};

/// The closed set of declaration kinds an outline is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic container for a whole scan (one file or a directory tree).
    Root,
    Module,
    Class,
    /// `def self.name` / `def Const.name`
    ClassMethod,
    /// Plain `def name`
    InstanceMethod,
}

impl NodeKind {
    /// Fixed display label per kind.
    pub fn human_name(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Module => "module",
            NodeKind::Class => "class",
            NodeKind::ClassMethod => "class method",
            NodeKind::InstanceMethod => "instance method",
        }
    }

    /// Modules, classes and the root hold nested declarations; methods never do.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Module | NodeKind::Class)
    }

    pub fn is_method(self) -> bool {
        matches!(self, NodeKind::ClassMethod | NodeKind::InstanceMethod)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    /// The path handed to the scan.
    Scan(PathBuf),
    /// Lines of the syntax subtree the declaration was built from.
    Syntax(Extent),
}

/// A node of the declaration tree.
///
/// Nodes own their children in discovery order. After construction the
/// tree is never mutated, so shared references can be handed to any number
/// of readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    name: Option<String>,
    origin: Origin,
    children: Vec<Node>,
}

impl Node {
    /// Create an empty root for a scan of `path`.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: NodeKind::Root,
            name: None,
            origin: Origin::Scan(path.into()),
            children: Vec::new(),
        }
    }

    pub(crate) fn declaration(kind: NodeKind, name: String, extent: Extent) -> Self {
        debug_assert!(kind != NodeKind::Root, "declarations cannot be roots");
        debug_assert!(!name.is_empty(), "declaration names are never empty");
        Self {
            kind,
            name: Some(name),
            origin: Origin::Syntax(extent),
            children: Vec::new(),
        }
    }

    /// Append `child` and hand it back for further construction.
    pub(crate) fn attach(&mut self, child: Node) -> &mut Node {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    pub fn human_name(&self) -> &'static str {
        self.kind.human_name()
    }

    /// Declared name; `None` only for the root.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Originating file, or the scanned path for the root.
    pub fn file_path(&self) -> &Path {
        match &self.origin {
            Origin::Scan(path) => path,
            Origin::Syntax(extent) => extent.file_path(),
        }
    }

    pub fn extent(&self) -> Option<&Extent> {
        match &self.origin {
            Origin::Scan(_) => None,
            Origin::Syntax(extent) => Some(extent),
        }
    }

    pub fn first_line(&self) -> Option<usize> {
        self.extent().map(Extent::first_line)
    }

    pub fn last_line(&self) -> Option<usize> {
        self.extent().map(Extent::last_line)
    }

    fn require_extent(&self) -> Result<&Extent, ExtentError> {
        self.extent()
            .ok_or(ExtentError::MissingExtent { kind: self.kind })
    }

    pub fn source(&self) -> Result<String, ExtentError> {
        Ok(self.require_extent()?.source())
    }

    pub fn source_lines(&self) -> Result<Vec<&str>, ExtentError> {
        Ok(self.require_extent()?.lines())
    }

    pub fn source_lines_with_numbers(&self) -> Result<Vec<(usize, &str)>, ExtentError> {
        Ok(self.require_extent()?.lines_with_numbers())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.extent()) {
            (Some(name), Some(extent)) => write!(
                f,
                "{} {} ({}:{}-{})",
                self.kind,
                name,
                extent.file_path().display(),
                extent.first_line(),
                extent.last_line()
            ),
            _ => write!(f, "{} ({})", self.kind, self.file_path().display()),
        }
    }
}
