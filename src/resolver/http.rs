// src/resolver/http.rs
// =============================================================================
// The real reachability resolver: one HTTP HEAD request per link.
//
// Key behavior:
// - One shared reqwest client (connection pooling), 10 second timeout
// - Redirects are NOT followed; a 3xx answer is judged against the options
// - Exactly one attempt per link, no retries
// - Transport failures (timeout, DNS, TLS) become ResolveError, never a
//   verdict about the link
// =============================================================================

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::{LinkResolver, ResolveError, ResolverOptions};

#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: Client,
}

impl HttpResolver {
    pub fn new() -> Self {
        // The client is built from constants; failure here is a programmer
        // error, not a runtime condition.
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkResolver for HttpResolver {
    fn check_unreachable(
        &self,
        address: &str,
        options: &ResolverOptions,
    ) -> impl std::future::Future<Output = Result<bool, ResolveError>> + Send {
        async move {
            let response = self
                .client
                .head(address)
                .send()
                .await
                .map_err(classify_transport_error)?;
            Ok(is_unreachable_status(response.status(), options))
        }
    }
}

fn classify_transport_error(error: reqwest::Error) -> ResolveError {
    if error.is_timeout() {
        ResolveError::Timeout
    } else {
        ResolveError::Transport(error.to_string())
    }
}

// Judges a status code under the configured policy.
//
// HTTP status codes:
// - 200-299: reachable
// - 300-399: reachable only if redirects are allowed
// - 404/410: reachable only if "not found" pages are allowed
// - 405: reachable (the server is there, it just rejects HEAD)
// - anything else 4xx/5xx: unreachable
fn is_unreachable_status(status: StatusCode, options: &ResolverOptions) -> bool {
    if options.ignore_status_codes.contains(&status.as_u16()) {
        return false;
    }
    if status.is_success() {
        return false;
    }
    if status.is_redirection() {
        return !options.allow_redirects;
    }
    if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        return !options.allow_404_pages;
    }
    if status == StatusCode::METHOD_NOT_ALLOWED {
        return false;
    }
    true
}
