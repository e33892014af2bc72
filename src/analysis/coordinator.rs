// src/analysis/coordinator.rs
// =============================================================================
// This module orchestrates one analysis request from trigger to publish.
//
// The flow per request:
// 1. extract links (zero links is a normal state, publish-as-clear)
// 2. fan out one verification future per link
// 3. join the whole fan-out, then aggregate into one finding set
// 4. publish only if the request's revision is still the latest one
//    known for that document
//
// Revisions are monotonically increasing per document. A newer request
// supersedes an older in-flight one: the older probes run to completion,
// their result is checked against the latest revision at publish time and
// dropped if stale. Last writer wins by revision, never by completion time.
// =============================================================================

use std::collections::HashMap;
use std::sync::Mutex;

use futures::stream::{self, StreamExt};
use log::debug;

use super::aggregate::merge_outcomes;
use super::extract::{extract_links, Extraction, LinkRecord};
use super::verify::{verify_link, FileStore, Finding, Severity};
use crate::document::{Document, DocumentId};
use crate::resolver::{LinkResolver, ResolverOptions};

// Concurrent reachability probes per request. Documents rarely carry more
// links than this; anything beyond queues up behind the in-flight probes.
const MAX_IN_FLIGHT_CHECKS: usize = 50;

// Accepts the finding set for a document. An empty slice means "clear
// everything previously published for this document".
pub trait Presentation {
    fn publish(&self, document: &DocumentId, findings: &[Finding]);
}

/// One "analyze this document now" request. Identifies a document revision;
/// carries no link data.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    document: DocumentId,
    revision: u64,
}

/// What became of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Findings were published for this revision.
    Published { findings: usize, errors: usize },
    /// The document had no links; an empty (clearing) set was published.
    NoLinks,
    /// A newer revision won; this result was discarded unpublished.
    Superseded,
    /// The document is not Markdown; the pipeline does not run.
    NotMarkdown,
}

/// The per-link result of an on-demand inspection, for report output.
#[derive(Debug, Clone)]
pub struct LinkVerification {
    pub link: LinkRecord,
    pub findings: Vec<Finding>,
}

/// The outcome of an on-demand inspection of a document.
#[derive(Debug, Clone)]
pub enum Inspection {
    NotMarkdown,
    NoLinks,
    Links(Vec<LinkVerification>),
}

#[derive(Debug, Default)]
struct DocumentState {
    latest: u64,
    published: Vec<Finding>,
}

/// Drives the whole pipeline and owns the per-document revision state.
pub struct AnalysisCoordinator<R, F, P> {
    resolver: R,
    files: F,
    presenter: P,
    options: ResolverOptions,
    state: Mutex<HashMap<DocumentId, DocumentState>>,
}

impl<R, F, P> AnalysisCoordinator<R, F, P>
where
    R: LinkResolver,
    F: FileStore,
    P: Presentation,
{
    pub fn new(resolver: R, files: F, presenter: P, options: ResolverOptions) -> Self {
        Self {
            resolver,
            files,
            presenter,
            options,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a new request for this document with a strictly greater
    /// revision token, superseding any outstanding request for it.
    pub fn begin(&self, document: &Document) -> AnalysisRequest {
        let mut state = self.state.lock().expect("coordinator state lock poisoned");
        let entry = state.entry(document.id().clone()).or_default();
        entry.latest += 1;
        AnalysisRequest {
            document: document.id().clone(),
            revision: entry.latest,
        }
    }

    /// Runs the pipeline for one request and publishes the result if the
    /// request is still current when it completes.
    pub async fn run(&self, document: &Document, request: AnalysisRequest) -> AnalysisOutcome {
        if !document.is_markdown() {
            return AnalysisOutcome::NotMarkdown;
        }

        match extract_links(document.lines()) {
            Extraction::NoLinks => {
                if self.try_publish(&request, &[]) {
                    AnalysisOutcome::NoLinks
                } else {
                    AnalysisOutcome::Superseded
                }
            }
            Extraction::Links(links) => {
                debug!(
                    "analyzing {} at revision {} ({} links)",
                    request.document,
                    request.revision,
                    links.len()
                );
                let outcomes = self.verify_all(document, &links).await;
                let findings = merge_outcomes(outcomes);
                if self.try_publish(&request, &findings) {
                    let errors = findings
                        .iter()
                        .filter(|finding| finding.severity == Severity::Error)
                        .count();
                    AnalysisOutcome::Published {
                        findings: findings.len(),
                        errors,
                    }
                } else {
                    AnalysisOutcome::Superseded
                }
            }
        }
    }

    /// Re-runs extraction and verification for a one-off report, pairing
    /// every link with its findings. Does not touch revisions and publishes
    /// nothing.
    pub async fn inspect(&self, document: &Document) -> Inspection {
        if !document.is_markdown() {
            return Inspection::NotMarkdown;
        }

        match extract_links(document.lines()) {
            Extraction::NoLinks => Inspection::NoLinks,
            Extraction::Links(links) => {
                let outcomes = self.verify_all(document, &links).await;
                let verified = links
                    .into_iter()
                    .zip(outcomes)
                    .map(|(link, outcomes)| LinkVerification {
                        link,
                        findings: outcomes.into_iter().flatten().collect(),
                    })
                    .collect();
                Inspection::Links(verified)
            }
        }
    }

    // Fans out one verification future per link and joins the lot. The
    // buffered stream caps how many probes run at once while keeping the
    // results in extraction order.
    async fn verify_all(
        &self,
        document: &Document,
        links: &[LinkRecord],
    ) -> Vec<Vec<Option<Finding>>> {
        let directory = document.directory();
        let mut checks = Vec::with_capacity(links.len());
        for link in links {
            checks.push(verify_link(
                link,
                directory,
                &self.resolver,
                &self.files,
                &self.options,
            ));
        }
        stream::iter(checks)
            .buffered(MAX_IN_FLIGHT_CHECKS)
            .collect()
            .await
    }

    // The single publish point. Publishing happens under the state lock so
    // a later revision can never slip between the staleness check and the
    // hand-off to the presenter.
    fn try_publish(&self, request: &AnalysisRequest, findings: &[Finding]) -> bool {
        let mut state = self.state.lock().expect("coordinator state lock poisoned");
        let entry = state.entry(request.document.clone()).or_default();
        if entry.latest != request.revision {
            debug!(
                "dropping stale result for {} (revision {} superseded by {})",
                request.document, request.revision, entry.latest
            );
            return false;
        }
        debug!(
            "publishing {} findings for {} (replacing {})",
            findings.len(),
            request.document,
            entry.published.len()
        );
        entry.published = findings.to_vec();
        self.presenter.publish(&request.document, findings);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::{
        markdown_document, GatedResolver, MockFiles, RecordingPresenter, StaticResolver,
    };
    use std::sync::Arc;

    fn coordinator<R: LinkResolver>(
        resolver: R,
        files: MockFiles,
    ) -> (
        AnalysisCoordinator<R, MockFiles, RecordingPresenter>,
        RecordingPresenter,
    ) {
        let presenter = RecordingPresenter::new();
        let coordinator = AnalysisCoordinator::new(
            resolver,
            files,
            presenter.clone(),
            ResolverOptions::default(),
        );
        (coordinator, presenter)
    }

    #[tokio::test]
    async fn test_non_markdown_documents_are_ignored() {
        let (coordinator, presenter) =
            coordinator(StaticResolver::reachable(), MockFiles::missing_everything());
        let document = Document::from_text("/docs/a.txt", "[a](https://a.test)");

        let request = coordinator.begin(&document);
        let outcome = coordinator.run(&document, request).await;

        assert_eq!(outcome, AnalysisOutcome::NotMarkdown);
        assert!(presenter.published().is_empty());
    }

    #[tokio::test]
    async fn test_no_links_publishes_an_empty_clearing_set() {
        let (coordinator, presenter) =
            coordinator(StaticResolver::reachable(), MockFiles::missing_everything());
        let document = markdown_document("/docs/a.md", &["plain text", "no links at all"]);

        let request = coordinator.begin(&document);
        let outcome = coordinator.run(&document, request).await;

        assert_eq!(outcome, AnalysisOutcome::NoLinks);
        let published = presenter.published();
        assert_eq!(published.len(), 1);
        assert!(published[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (coordinator, presenter) =
            coordinator(StaticResolver::reachable(), MockFiles::missing_everything());
        let document = markdown_document(
            "/docs/doc.md",
            &[
                "See [docs](https://x.test/en-us/a)",
                "local [img](./missing.png)",
            ],
        );

        let request = coordinator.begin(&document);
        let outcome = coordinator.run(&document, request).await;

        assert_eq!(
            outcome,
            AnalysisOutcome::Published {
                findings: 2,
                errors: 1
            }
        );
        let published = presenter.published();
        assert_eq!(published.len(), 1);
        let findings = &published[0].1;
        assert_eq!(findings.len(), 2);

        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].range.line, 0);
        assert_eq!(
            findings[0].message,
            "Link contains a language reference: en-us"
        );

        assert_eq!(findings[1].severity, Severity::Error);
        assert_eq!(findings[1].range.line, 1);
        assert_eq!(findings[1].message, "Linked file does not exist");
    }

    #[tokio::test]
    async fn test_unchanged_document_publishes_identical_findings() {
        let (coordinator, presenter) =
            coordinator(StaticResolver::unreachable(), MockFiles::missing_everything());
        let document = markdown_document(
            "/docs/doc.md",
            &["[a](https://a.test/en-us/x)", "[b](https://b.test)"],
        );

        let first = coordinator.begin(&document);
        coordinator.run(&document, first).await;
        let second = coordinator.begin(&document);
        coordinator.run(&document, second).await;

        let published = presenter.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].1, published[1].1);
        assert!(!published[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_superseded_result_is_never_published() {
        let resolver = GatedResolver::new();
        let handle = resolver.clone();
        let (coordinator, presenter) =
            coordinator(resolver, MockFiles::missing_everything());
        let coordinator = Arc::new(coordinator);
        let document = markdown_document("/docs/doc.md", &["[dead](https://dead.example)"]);

        // First request: its probe blocks, then would report "unreachable".
        let first = coordinator.begin(&document);
        let first_task = tokio::spawn({
            let coordinator = coordinator.clone();
            let document = document.clone();
            async move { coordinator.run(&document, first).await }
        });
        handle.wait_until_probing().await;

        // Second request overtakes and completes cleanly.
        let second = coordinator.begin(&document);
        let second_outcome = coordinator.run(&document, second).await;
        assert_eq!(
            second_outcome,
            AnalysisOutcome::Published {
                findings: 0,
                errors: 0
            }
        );

        // Now let the stale probe finish: its nonzero result must be dropped.
        handle.release_first();
        let first_outcome = first_task.await.expect("task completes");
        assert_eq!(first_outcome, AnalysisOutcome::Superseded);

        let published = presenter.published();
        assert_eq!(published.len(), 1);
        assert!(published[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_check_failures_never_abort_the_analysis() {
        let (coordinator, presenter) = coordinator(
            StaticResolver::failing(),
            MockFiles::containing(&["/docs/exists.md"]),
        );
        let document = markdown_document(
            "/docs/doc.md",
            &["[flaky](https://flaky.example/en-us/a)", "[ok](./exists.md)"],
        );

        let request = coordinator.begin(&document);
        let outcome = coordinator.run(&document, request).await;

        // The failed probe yields nothing; the locale warning still lands.
        assert_eq!(
            outcome,
            AnalysisOutcome::Published {
                findings: 1,
                errors: 0
            }
        );
        let findings = &presenter.published()[0].1;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_edit_that_removes_links_clears_findings() {
        let (coordinator, presenter) =
            coordinator(StaticResolver::unreachable(), MockFiles::missing_everything());

        let before = markdown_document("/docs/doc.md", &["[dead](https://dead.example)"]);
        let request = coordinator.begin(&before);
        coordinator.run(&before, request).await;

        let after = markdown_document("/docs/doc.md", &["all links removed"]);
        let request = coordinator.begin(&after);
        let outcome = coordinator.run(&after, request).await;

        assert_eq!(outcome, AnalysisOutcome::NoLinks);
        let published = presenter.published();
        assert_eq!(published.len(), 2);
        assert!(!published[0].1.is_empty());
        assert!(published[1].1.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_pairs_links_with_findings() {
        let (coordinator, _presenter) =
            coordinator(StaticResolver::reachable(), MockFiles::missing_everything());
        let document = markdown_document(
            "/docs/doc.md",
            &["[a](https://a.test/en-us/x)", "[b](ftp://b.test/file)"],
        );

        match coordinator.inspect(&document).await {
            Inspection::Links(verified) => {
                assert_eq!(verified.len(), 2);
                assert_eq!(verified[0].findings.len(), 1);
                assert!(verified[1].findings.is_empty());
            }
            other => panic!("expected links, got {other:?}"),
        }
    }
}
