// src/resolver/mod.rs
// =============================================================================
// This module defines the link-reachability resolver.
//
// The resolver is the one collaborator the pipeline treats as unreliable:
// it probes the network, and any failure it reports must degrade to "no
// finding" upstream rather than abort the analysis. The trait keeps the
// pipeline testable with in-memory resolvers; `HttpResolver` is the real one.
// =============================================================================

mod http;

pub use http::HttpResolver;

use std::future::Future;

use thiserror::Error;

// Explicit resolver configuration. Every recognized option is a field;
// nothing is read out of loosely-typed bags.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Treat redirected (3xx) responses as reachable.
    pub allow_redirects: bool,
    /// Treat 404/410 responses as reachable.
    pub allow_404_pages: bool,
    /// HTTP status codes that never count against a link.
    pub ignore_status_codes: Vec<u16>,
}

// A resolver-level failure: the probe itself could not complete.
// Distinct from "the probe completed and the target is unreachable".
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Transport(String),
}

// Probes whether a link target is unreachable.
//
// `Ok(true)` means the target is unreachable; `Ok(false)` means it answered
// acceptably under the given options. `Err` means the probe itself failed
// and nothing can be said about the link.
pub trait LinkResolver {
    fn check_unreachable(
        &self,
        address: &str,
        options: &ResolverOptions,
    ) -> impl Future<Output = Result<bool, ResolveError>> + Send;
}
