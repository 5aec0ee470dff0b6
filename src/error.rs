//! Error types
//!
//! Parsing, path-query and load failures. None of these ever escape a
//! `ReportDoc` constructor; they surface only from the lower-level APIs.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed XML input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Syntactically invalid path expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path '{path}': {message}")]
pub struct QueryError {
    pub path: String,
    pub message: String,
}

impl QueryError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        QueryError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure to turn a file on disk into a document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Path of the file that failed to load
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Unclosed tag: <report>", 42);
        assert_eq!(err.to_string(), "Unclosed tag: <report> at byte 42");
    }

    #[test]
    fn test_load_error_keeps_path() {
        let err = LoadError::Parse {
            path: PathBuf::from("out/report.xml"),
            source: ParseError::new("Missing root element", 0),
        };
        assert_eq!(err.path(), std::path::Path::new("out/report.xml"));
        assert!(err.to_string().contains("out/report.xml"));
        assert!(err.to_string().contains("Missing root element"));
    }
}
