// src/analysis/testutil.rs
// =============================================================================
// In-memory collaborators for pipeline tests: a canned resolver, a resolver
// that can be held open mid-probe, a recording presenter, and a fake
// filesystem. Compiled only for tests.
// =============================================================================

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::analysis::coordinator::Presentation;
use crate::analysis::verify::{FileStore, Finding};
use crate::document::{Document, DocumentId};
use crate::resolver::{LinkResolver, ResolveError, ResolverOptions};

/// A resolver with one canned answer for every address.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    unreachable: bool,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticResolver {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn reachable() -> Self {
        Self {
            unreachable: false,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            unreachable: false,
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LinkResolver for StaticResolver {
    fn check_unreachable(
        &self,
        _address: &str,
        _options: &ResolverOptions,
    ) -> impl Future<Output = Result<bool, ResolveError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let unreachable = self.unreachable;
        let fail = self.fail;
        async move {
            if fail {
                Err(ResolveError::Transport("mock transport failure".to_string()))
            } else {
                Ok(unreachable)
            }
        }
    }
}

/// A resolver whose first probe blocks until released, so a test can hold
/// one analysis in flight while a newer one overtakes it. The held probe
/// reports "unreachable"; later probes answer "reachable" immediately.
#[derive(Debug, Clone)]
pub struct GatedResolver {
    started: Arc<Notify>,
    release: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

impl GatedResolver {
    pub fn new() -> Self {
        Self {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits until the first probe is in flight.
    pub async fn wait_until_probing(&self) {
        self.started.notified().await;
    }

    /// Lets the held first probe complete.
    pub fn release_first(&self) {
        self.release.notify_one();
    }
}

impl LinkResolver for GatedResolver {
    fn check_unreachable(
        &self,
        _address: &str,
        _options: &ResolverOptions,
    ) -> impl Future<Output = Result<bool, ResolveError>> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let started = self.started.clone();
        let release = self.release.clone();
        async move {
            if call == 0 {
                started.notify_one();
                release.notified().await;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }
}

/// Records every publish so tests can assert on exactly what reached the
/// presentation collaborator, and in what order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    published: Arc<Mutex<Vec<(DocumentId, Vec<Finding>)>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(DocumentId, Vec<Finding>)> {
        self.published.lock().unwrap().clone()
    }
}

impl Presentation for RecordingPresenter {
    fn publish(&self, document: &DocumentId, findings: &[Finding]) {
        self.published
            .lock()
            .unwrap()
            .push((document.clone(), findings.to_vec()));
    }
}

/// A fake filesystem that also records which paths were asked about.
#[derive(Debug, Default)]
pub struct MockFiles {
    existing: HashSet<PathBuf>,
    checked: Mutex<Vec<PathBuf>>,
}

impl MockFiles {
    pub fn missing_everything() -> Self {
        Self::default()
    }

    pub fn containing(paths: &[&str]) -> Self {
        Self {
            existing: paths.iter().map(PathBuf::from).collect(),
            checked: Mutex::new(Vec::new()),
        }
    }

    pub fn checked(&self) -> Vec<PathBuf> {
        self.checked.lock().unwrap().clone()
    }
}

impl FileStore for MockFiles {
    fn exists(&self, path: &Path) -> bool {
        self.checked.lock().unwrap().push(path.to_path_buf());
        self.existing.contains(path)
    }
}

/// A Markdown document built straight from lines, for tests.
pub fn markdown_document(path: &str, lines: &[&str]) -> Document {
    Document::from_text(path, &lines.join("\n"))
}
