// src/analysis/classify.rs
// =============================================================================
// This module classifies link addresses.
//
// All functions here are pure and total: they take an address string and
// return a fact about it. No I/O, no failure modes. The verifier decides
// which checks to run for a link based on these answers.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

// A two-letter-language/two-letter-region path segment, e.g. `/en-us/`.
// Capture 1 is the code without the surrounding separators.
static LOCALE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([a-z]{2}-[a-z]{2})/").expect("locale pattern is valid")
});

// True iff the address is a syntactically valid URL with an explicit
// http or https scheme. We lean on the url crate rather than writing
// URL-validation logic ourselves.
pub fn is_http_link(address: &str) -> bool {
    Url::parse(address)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

// True iff the address starts with "ftp", case-insensitively.
pub fn is_ftp_link(address: &str) -> bool {
    address
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("ftp"))
}

// Returns the first locale code in the address, e.g. `en-us` for an address
// containing `/en-us/`. A locale-pinned page is a documentation-quality
// signal, not a correctness error.
pub fn locale_code(address: &str) -> Option<&str> {
    LOCALE_PATTERN
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|code| code.as_str())
}

// True iff the address is neither HTTP(S) nor FTP, i.e. it should be treated
// as a path relative to the document.
pub fn is_relative(address: &str) -> bool {
    !is_http_link(address) && !is_ftp_link(address)
}
