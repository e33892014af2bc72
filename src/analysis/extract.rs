// src/analysis/extract.rs
// =============================================================================
// This module parses Markdown-style links out of document text.
//
// Extraction is line-oriented. Two link forms are recognized on every line,
// tested by one alternated pattern:
// - inline form:    [label](address)
// - reference form: [label]: address
//
// `scan_links` is lazy: it returns an iterator that walks the lines on demand
// and can be recreated from the same document at any time. `extract_links`
// collects a full pass and distinguishes "no links anywhere" from a populated
// result, because callers treat the two very differently.
// =============================================================================

use std::sync::LazyLock;

use regex::Regex;

// One pattern, two alternatives. Capture 1 holds the inline-form address,
// capture 2 the reference-form address. Exactly one of them is present on
// any match.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\[]+\]\(([^)]+)\)|\[[A-Za-z0-9_-]+\]:\s*(\S+)")
        .expect("link pattern is valid")
});

// A single link parsed out of the document.
//
// `text` is the full matched markup and is always a substring of `line_text`,
// so a column range can be recomputed later without re-scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// The raw matched markup, e.g. the whole `[label](address)` span.
    pub text: String,
    /// The target address (reference-form capture wins over inline-form).
    pub address: String,
    /// 0-based line index of the containing line.
    pub line: usize,
    /// Full text of the containing line.
    pub line_text: String,
}

// The outcome of one extraction pass.
//
// "No links anywhere" is a normal state, not an error: the caller publishes
// an empty finding set (clearing stale findings) instead of fanning out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The document contains no recognizable links.
    NoLinks,
    /// At least one link, ordered top-to-bottom, left-to-right.
    Links(Vec<LinkRecord>),
}

// Lazily scans document lines for links, in document order.
//
// A match whose address capture is somehow missing is dropped silently; a
// half-formed link is not worth reporting and must never abort the scan.
pub fn scan_links(lines: &[String]) -> impl Iterator<Item = LinkRecord> + '_ {
    lines.iter().enumerate().flat_map(|(line, line_text)| {
        LINK_PATTERN.captures_iter(line_text).filter_map(move |caps| {
            // Reference-form capture takes precedence when present.
            let address = caps.get(2).or_else(|| caps.get(1))?.as_str();
            if address.is_empty() {
                return None;
            }
            Some(LinkRecord {
                text: caps[0].to_string(),
                address: address.to_string(),
                line,
                line_text: line_text.clone(),
            })
        })
    })
}

// Runs one full extraction pass over the document.
pub fn extract_links(lines: &[String]) -> Extraction {
    let links: Vec<LinkRecord> = scan_links(lines).collect();
    if links.is_empty() {
        Extraction::NoLinks
    } else {
        Extraction::Links(links)
    }
}
