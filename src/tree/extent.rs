use crate::tree::node::NodeKind;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtentError {
    #[error("{kind} node has no source extent")]
    MissingExtent { kind: NodeKind },
}

/// Full text of one parsed file, shared by every node built from it.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            text: text.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines `first..=last` (1-indexed), stopping at end of file.
    pub fn lines(&self, first: usize, last: usize) -> Vec<&str> {
        if first == 0 || last < first {
            return Vec::new();
        }
        self.text
            .lines()
            .skip(first - 1)
            .take(last - first + 1)
            .collect()
    }
}

/// Inclusive, 1-indexed line range of a declaration within its file.
#[derive(Clone, PartialEq, Eq)]
pub struct Extent {
    file: Arc<SourceFile>,
    first_line: usize,
    last_line: usize,
}

impl Extent {
    /// Build an extent from explicit line numbers.
    ///
    /// Returns `None` unless `1 <= first_line <= last_line`.
    pub fn new(file: Arc<SourceFile>, first_line: usize, last_line: usize) -> Option<Self> {
        (first_line >= 1 && first_line <= last_line).then_some(Self {
            file,
            first_line,
            last_line,
        })
    }

    /// Extent covered by a syntax node of `file`'s tree.
    ///
    /// A node that ends at column 0 of a later row stops on the row before.
    pub fn from_syntax_node(file: &Arc<SourceFile>, node: tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();

        let mut last_row = end.row;
        if end.column == 0 && end.row > start.row {
            last_row -= 1;
        }

        Self {
            file: Arc::clone(file),
            first_line: start.row + 1,
            last_line: last_row + 1,
        }
    }

    pub fn file_path(&self) -> &Path {
        self.file.path()
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn last_line(&self) -> usize {
        self.last_line
    }

    pub fn line_span(&self) -> usize {
        self.last_line - self.first_line + 1
    }

    /// True when `other` lies in the same file, within this range.
    pub fn contains(&self, other: &Extent) -> bool {
        Arc::ptr_eq(&self.file, &other.file)
            && self.first_line <= other.first_line
            && other.last_line <= self.last_line
    }

    pub fn lines(&self) -> Vec<&str> {
        self.file.lines(self.first_line, self.last_line)
    }

    pub fn lines_with_numbers(&self) -> Vec<(usize, &str)> {
        (self.first_line..=self.last_line)
            .zip(self.lines())
            .collect()
    }

    pub fn source(&self) -> String {
        self.lines().join("\n")
    }
}

impl fmt::Debug for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}",
            self.file.path().display(),
            self.first_line,
            self.last_line
        )
    }
}

/// Every file that contributed declarations to a scan, in scan order.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    pub fn insert(&mut self, file: Arc<SourceFile>) {
        self.files.push(file);
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Arc<SourceFile>> {
        let path = path.as_ref();
        self.files.iter().find(|file| file.path() == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SourceFile>> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
