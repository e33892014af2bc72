// src/analysis/verify.rs
// =============================================================================
// This module runs the per-link verification checks and produces findings.
//
// Three independent checks per link:
// - locale check (sync): flags locale-pinned addresses like /en-us/
// - reachability check (async): delegates to the resolver collaborator,
//   only for HTTP(S) links
// - local-path check (sync): existence of relative targets on disk
//
// Every check returns Option<Finding>: Some means "problem found", None
// means "nothing to report". A check that cannot complete is logged and
// contributes None — it never aborts sibling checks or the analysis.
// =============================================================================

use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classify::{is_http_link, is_relative, locale_code};
use super::extract::LinkRecord;
use crate::resolver::{LinkResolver, ResolveError, ResolverOptions};

/// How bad a finding is. Warnings are quality signals; errors are broken
/// links.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// Where in the document a finding points. Line is 0-based; columns are
/// character offsets into the line, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

/// A positioned, severity-tagged report about one link. Immutable once
/// created; ownership moves to the presentation collaborator on publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub range: Range,
    pub message: String,
    pub source_link_text: String,
}

impl Finding {
    fn new(severity: Severity, link: &LinkRecord, message: impl Into<String>) -> Self {
        Self {
            severity,
            range: locate(link),
            message: message.into(),
            source_link_text: link.text.clone(),
        }
    }
}

// Recomputes the column range of a link from its retained line text.
// Columns are counted in characters so they line up with editor columns.
fn locate(link: &LinkRecord) -> Range {
    let start_byte = link.line_text.find(&link.text).unwrap_or(0);
    let start = link.line_text[..start_byte].chars().count();
    let end = start + link.text.chars().count();
    Range {
        line: link.line,
        start,
        end,
    }
}

// A verification check that could not complete. Link-local by design:
// the caller logs it and moves on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("reachability probe failed: {0}")]
    Resolve(#[from] ResolveError),
}

// Answers whether a path exists. Abstracted so the local-path check can be
// tested without touching the real filesystem.
pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy)]
pub struct LocalFiles;

impl FileStore for LocalFiles {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

// Flags addresses pinned to a specific locale, e.g. /en-us/.
pub fn locale_check(link: &LinkRecord) -> Option<Finding> {
    locale_code(&link.address).map(|code| {
        Finding::new(
            Severity::Warning,
            link,
            format!("Link contains a language reference: {code}"),
        )
    })
}

// Asks the resolver whether an HTTP(S) target is unreachable.
pub async fn reachability_check<R: LinkResolver>(
    link: &LinkRecord,
    resolver: &R,
    options: &ResolverOptions,
) -> Result<Option<Finding>, CheckError> {
    let unreachable = resolver.check_unreachable(&link.address, options).await?;
    if unreachable {
        Ok(Some(Finding::new(
            Severity::Error,
            link,
            "Link is unreachable",
        )))
    } else {
        Ok(None)
    }
}

// Tests whether a relative target exists on disk. The anchor fragment is
// part of the link, not the file, so it is stripped before resolution.
pub fn path_check<F: FileStore>(
    link: &LinkRecord,
    document_dir: &Path,
    files: &F,
) -> Option<Finding> {
    let path_part = link.address.split('#').next().unwrap_or_default();
    if path_part.is_empty() {
        // Pure fragment links point inside the document itself.
        return None;
    }
    let resolved = resolve_relative(document_dir, path_part);
    if files.exists(&resolved) {
        None
    } else {
        Some(Finding::new(
            Severity::Error,
            link,
            "Linked file does not exist",
        ))
    }
}

// Resolves an address against the document's directory, folding `.` and
// `..` components lexically so the file store sees a clean path.
fn resolve_relative(document_dir: &Path, address: &str) -> PathBuf {
    let mut resolved = document_dir.to_path_buf();
    for component in Path::new(address).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

// Runs every check that applies to one link and collects the outcomes.
//
// The locale check always runs; the reachability check only for HTTP(S)
// links; the local-path check only for relative addresses. FTP links get
// neither — they are classified and surfaced informationally, never flagged
// as broken. A failed check contributes None.
pub async fn verify_link<R: LinkResolver, F: FileStore>(
    link: &LinkRecord,
    document_dir: &Path,
    resolver: &R,
    files: &F,
    options: &ResolverOptions,
) -> Vec<Option<Finding>> {
    let mut outcomes = vec![locale_check(link)];

    if is_http_link(&link.address) {
        match reachability_check(link, resolver, options).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => {
                debug!("check failed for {}: {error}", link.address);
                outcomes.push(None);
            }
        }
    } else if is_relative(&link.address) {
        outcomes.push(path_check(link, document_dir, files));
    }

    outcomes
}
