//! Content store - discovers source documents under the content root

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Diagnostic;

/// A source document as read from disk
#[derive(Debug, Clone)]
pub struct ContentNode {
    /// Absolute file path
    pub path: PathBuf,
    /// Path relative to the content root
    pub relative_path: PathBuf,
    /// Full file text, front-matter included
    pub raw: String,
}

/// All source documents of one generation run
#[derive(Debug, Default)]
pub struct ContentStore {
    root: PathBuf,
    nodes: Vec<ContentNode>,
}

impl ContentStore {
    /// Build a store from nodes already in memory
    pub fn from_nodes<P: Into<PathBuf>>(root: P, mut nodes: Vec<ContentNode>) -> Self {
        nodes.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Self {
            root: root.into(),
            nodes,
        }
    }

    /// Scan the content root for Markdown files.
    ///
    /// Files matching an `ignore` glob (relative to the root) are skipped.
    /// Unreadable files become diagnostics rather than failing the scan.
    pub fn scan(root: &Path, ignore: &[String]) -> Result<(Self, Vec<Diagnostic>)> {
        let patterns = ignore
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;

        let mut nodes = Vec::new();
        let mut diagnostics = Vec::new();

        if !root.exists() {
            tracing::warn!("Content directory {:?} does not exist", root);
            return Ok((Self::from_nodes(root, nodes), diagnostics));
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    diagnostics.push(Diagnostic::new(path, e.to_string()));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            if patterns.iter().any(|p| p.matches_path(&relative_path)) {
                tracing::debug!("Ignored: {:?}", relative_path);
                continue;
            }

            match fs::read_to_string(path) {
                Ok(raw) => nodes.push(ContentNode {
                    path: path.to_path_buf(),
                    relative_path,
                    raw,
                }),
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", relative_path, e);
                    diagnostics.push(Diagnostic::new(relative_path, e.to_string()));
                }
            }
        }

        tracing::debug!("Scanned {} documents under {:?}", nodes.len(), root);
        Ok((Self::from_nodes(root, nodes), diagnostics))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Nodes ordered by relative path
    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
