use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Vendored, generated and VCS directories relative to the scanned directory.
pub const DEFAULT_EXCLUDE: &str = r"(^|/)(vendor|node_modules|tmp|\.git)/";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct OutlineConfig {
    #[serde(default)]
    pub scan: ScanConfig,
}

impl OutlineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues = self.scan.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// Which files a directory scan visits.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// File extensions without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Regex matched against each candidate's path relative to the scanned
    /// directory, `/`-separated, rather than against the full path: the
    /// directories above the scan root never exclude anything, so a project
    /// checked out under `/tmp` is still scanned with the default pattern.
    /// An empty pattern disables exclusion. A single-file scan is never
    /// excluded.
    #[serde(default = "default_exclude")]
    pub exclude: String,
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: default_exclude(),
            follow_links: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["rb".to_string()]
}

fn default_exclude() -> String {
    DEFAULT_EXCLUDE.to_string()
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Compiled exclusion pattern, `None` when exclusion is disabled.
    pub fn exclude_regex(&self) -> Result<Option<Regex>, regex::Error> {
        if self.exclude.is_empty() {
            return Ok(None);
        }
        Regex::new(&self.exclude).map(Some)
    }

    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }

    fn issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.extensions.is_empty() {
            issues.push(ValidationIssue::EmptyExtensions);
        }

        for ext in &self.extensions {
            if ext.trim().is_empty() {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "extension is blank".to_string(),
                });
            } else if ext.starts_with('.') {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "omit the leading dot".to_string(),
                });
            }
        }

        if let Err(err) = self.exclude_regex() {
            issues.push(ValidationIssue::InvalidExclude {
                pattern: self.exclude.clone(),
                message: err.to_string(),
            });
        }

        issues
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyExtensions,
    InvalidExtension { extension: String, message: String },
    InvalidExclude { pattern: String, message: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyExtensions => {
                write!(f, "scan.extensions must list at least one extension")
            }
            ValidationIssue::InvalidExtension { extension, message } => {
                write!(f, "invalid extension '{extension}': {message}")
            }
            ValidationIssue::InvalidExclude { pattern, message } => {
                write!(f, "invalid exclude pattern '{pattern}': {message}")
            }
        }
    }
}
