//! Building a declaration tree for a file or a whole directory.
//!
//! Each candidate file is read, parsed and visited on its own. A file that
//! cannot be read or does not parse is reported as one diagnostic line
//! (`<path>: <error>`) and skipped; the rest of the scan carries on.

use crate::config::{ScanConfig, ValidationError};
use crate::pool;
use crate::tree::{traverse, Node, SourceFile, SourceMap};
use crate::ts::TreeSitterError;
use regex::Regex;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Failures that stop a scan before any file is visited.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot scan {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid scan configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("invalid exclude pattern: {0}")]
    Exclude(#[from] regex::Error),

    #[error("parser unavailable: {0}")]
    Parser(#[source] TreeSitterError),
}

/// A candidate file that was skipped.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: TreeSitterError,
}

impl fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Result of a scan: the root node plus the files that fed it.
#[derive(Debug)]
pub struct Outline {
    root: Node,
    sources: SourceMap,
    failures: Vec<ScanFailure>,
}

impl Outline {
    /// The synthetic root; its `file_path` is the scanned path.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn children(&self) -> &[Node] {
        self.root.children()
    }

    pub fn file_path(&self) -> &Path {
        self.root.file_path()
    }

    pub fn find_all<F>(&self, matcher: F) -> Vec<&Node>
    where
        F: FnMut(&Node) -> bool,
    {
        self.root.find_all(matcher)
    }

    /// Files whose declarations are in the tree, in scan order.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }
}

/// Enumerates candidate files and merges their declarations under one root.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
    exclude: Option<Regex>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let exclude = config.exclude_regex()?;
        Ok(Self { config, exclude })
    }

    /// Files a scan of `path` would visit, in sorted order.
    ///
    /// A file path is its own single candidate, whatever its extension.
    pub fn candidates(&self, path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let metadata = fs::metadata(path).map_err(|source| ScanError::Path {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let walker = WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        "scan: skipping unreadable entry under {}: {}",
                        path.display(),
                        err
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let candidate = entry.path();
            let wanted = candidate
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.config.matches_extension(ext));
            if !wanted {
                continue;
            }
            if self.is_excluded(path, candidate) {
                debug!("scan: exclude {}", candidate.display());
                continue;
            }
            files.push(candidate.to_path_buf());
        }

        Ok(files)
    }

    fn is_excluded(&self, root: &Path, candidate: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        let relative = candidate.strip_prefix(root).unwrap_or(candidate);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        exclude.is_match(&relative)
    }

    /// Scan `path`, writing per-file diagnostics to stderr.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<Outline, ScanError> {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        self.scan_with_diagnostics(path, &mut lock)
    }

    /// Scan `path`, writing one `<path>: <error>` line per skipped file to
    /// `diagnostics`.
    pub fn scan_with_diagnostics<W>(
        &self,
        path: impl AsRef<Path>,
        diagnostics: &mut W,
    ) -> Result<Outline, ScanError>
    where
        W: Write + ?Sized,
    {
        let path = path.as_ref();
        let candidates = self.candidates(path)?;
        info!("scan: start -> {} ({} candidates)", path.display(), candidates.len());

        let mut outline = Outline {
            root: Node::root(path),
            sources: SourceMap::default(),
            failures: Vec::new(),
        };

        for candidate in candidates {
            let before = outline.root.children().len();
            match outline_file(&candidate, &mut outline.root) {
                Ok(file) => {
                    debug!(
                        "scan: {} -> {} top-level declarations",
                        candidate.display(),
                        outline.root.children().len() - before
                    );
                    outline.sources.insert(file);
                }
                Err(TreeSitterError::LanguageSet) => {
                    return Err(ScanError::Parser(TreeSitterError::LanguageSet));
                }
                Err(error) => {
                    let failure = ScanFailure {
                        path: candidate,
                        error,
                    };
                    debug!("scan: skip {}", failure);
                    if let Err(err) = writeln!(diagnostics, "{failure}") {
                        warn!("scan: failed to write diagnostic: {}", err);
                    }
                    outline.failures.push(failure);
                }
            }
        }

        info!(
            "scan: done -> {} files, {} declarations, {} failed",
            outline.sources.len(),
            outline.root.descendant_count(),
            outline.failures.len()
        );
        Ok(outline)
    }
}

/// Parse one file and attach its declarations to `root`.
///
/// Nothing is attached when the file has a syntax error.
fn outline_file(path: &Path, root: &mut Node) -> Result<Arc<SourceFile>, TreeSitterError> {
    let text = fs::read_to_string(path).map_err(|source| TreeSitterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = SourceFile::new(path, text);
    attach_source(&file, root)?;
    Ok(file)
}

fn attach_source(file: &Arc<SourceFile>, root: &mut Node) -> Result<(), TreeSitterError> {
    pool::with_parser(|parser| -> Result<(), TreeSitterError> {
        let parsed = parser.parse_tree(file.text())?;
        parsed.check_syntax()?;
        traverse(parsed.root_node(), file, root);
        Ok(())
    })?
}

/// Scan a file or directory with the default configuration.
pub fn build_from_path(path: impl AsRef<Path>) -> Result<Outline, ScanError> {
    Scanner::new(ScanConfig::default())?.scan(path)
}

/// Build the declaration tree of in-memory source labelled `path`.
///
/// Unlike a scan, a syntax error is returned to the caller.
pub fn outline_source(
    path: impl Into<PathBuf>,
    text: impl Into<String>,
) -> Result<Node, TreeSitterError> {
    let path = path.into();
    let file = SourceFile::new(path.clone(), text);
    let mut root = Node::root(path);
    attach_source(&file, &mut root)?;
    Ok(root)
}
