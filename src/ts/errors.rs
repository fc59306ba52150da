use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at line {line}, column {column}")]
    SyntaxError { line: usize, column: usize },

    #[error("{count} syntax errors, first at line {line}, column {column}")]
    MultipleSyntaxErrors {
        count: usize,
        line: usize,
        column: usize,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeSitterError {
    /// True for malformed-source failures, as opposed to parser setup or I/O.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            TreeSitterError::SyntaxError { .. } | TreeSitterError::MultipleSyntaxErrors { .. }
        )
    }
}
