//! Build errors and per-document diagnostics

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Slug collision on {slug:?}: {first:?} and {second:?} derive the same route")]
    SlugCollision {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{source_path:?} derives the reserved slug {slug:?}")]
    ReservedSlug { slug: String, source_path: PathBuf },

    #[error("{source_path:?} derives an empty slug")]
    EmptySlug { source_path: PathBuf },

    #[error("Two pages claim the route {path}")]
    RouteConflict { path: String },

    #[error("{} document(s) failed to resolve:\n{}", .0.len(), format_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A problem with a single source document. The document is left out of
/// the generated site; the rest of the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub source: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.message)
    }
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_names_both_sources() {
        let err = BuildError::SlugCollision {
            slug: "hello".to_string(),
            first: PathBuf::from("hello.md"),
            second: PathBuf::from("hello/index.md"),
        };
        let msg = err.to_string();
        assert!(msg.contains("hello.md"));
        assert!(msg.contains("hello/index.md"));
    }

    #[test]
    fn test_diagnostics_message() {
        let err = BuildError::Diagnostics(vec![
            Diagnostic::new("a.md", "missing date"),
            Diagnostic::new("b.md", "invalid date \"soon\""),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 document(s) failed to resolve"));
        assert!(msg.contains("a.md: missing date"));
        assert!(msg.contains("b.md: invalid date"));
    }
}
