// src/document.rs
// =============================================================================
// This module is the document side of the host surface: a file loaded into
// memory with a stable identity, a language tag, and its text as lines.
//
// The analysis pipeline only ever sees this view. It activates for Markdown
// documents and ignores everything else.
// =============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Stable identity of a document, used to key revisions and published
/// findings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The language tag the pipeline keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Other,
}

/// A document as the pipeline sees it: identity, kind, ordered lines, and
/// the directory relative links resolve against.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    path: PathBuf,
    kind: DocumentKind,
    lines: Vec<String>,
}

impl Document {
    /// Loads a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Ok(Self::from_text(path, &text))
    }

    /// Builds a document from already-available text.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        Self {
            id: DocumentId(path.display().to_string()),
            kind: kind_of(&path),
            lines: text.lines().map(String::from).collect(),
            path,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == DocumentKind::Markdown
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The directory relative link targets resolve against.
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

fn kind_of(path: &Path) -> DocumentKind {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    if extension.eq_ignore_ascii_case("md") || extension.eq_ignore_ascii_case("markdown") {
        DocumentKind::Markdown
    } else {
        DocumentKind::Other
    }
}
