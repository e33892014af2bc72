// src/report.rs
// =============================================================================
// This module is the presentation side of the host surface.
//
// Two output shapes:
// - StdoutPresenter: receives published finding sets and renders them as a
//   table or JSON. An empty set means "all clear" and is said so.
// - Report: the on-demand per-link report, one line per link in the form
//   `Info|Warning|Error: <address> on line <n>: <reason>`.
//
// Line numbers are 0-based inside the pipeline; everything printed here is
// 1-based for humans.
// =============================================================================

use std::fmt;

use log::warn;

use crate::analysis::{is_ftp_link, Finding, Inspection, LinkVerification, Presentation, Severity};
use crate::document::DocumentId;

/// Renders published findings to stdout.
pub struct StdoutPresenter {
    json: bool,
}

impl StdoutPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Presentation for StdoutPresenter {
    fn publish(&self, document: &DocumentId, findings: &[Finding]) {
        if self.json {
            match serde_json::to_string_pretty(findings) {
                Ok(json) => println!("{json}"),
                Err(error) => warn!("could not serialize findings: {error}"),
            }
        } else if findings.is_empty() {
            println!("✅ No link problems found in {document}");
        } else {
            print_table(findings);
        }
    }
}

// Prints findings as a human-readable table with a summary, one row per
// finding.
fn print_table(findings: &[Finding]) {
    println!(
        "{:<6} {:<9} {:<48} {:<30}",
        "LINE", "SEVERITY", "MESSAGE", "LINK"
    );
    println!("{}", "=".repeat(95));

    for finding in findings {
        println!(
            "{:<6} {:<9} {:<48} {:<30}",
            finding.range.line + 1,
            finding.severity.to_string(),
            finding.message,
            truncate(&finding.source_link_text, 27),
        );
    }

    println!();

    let errors = findings
        .iter()
        .filter(|finding| finding.severity == Severity::Error)
        .count();
    println!("📊 Summary:");
    println!("   ⚠️  Warnings: {}", findings.len() - errors);
    println!("   ❌ Errors: {}", errors);
    println!("   📋 Total: {}", findings.len());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

// The severity scale of a report line. Links with nothing to say about them
// still get a line, at Info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportLevel {
    Info,
    Warning,
    Error,
}

impl From<Severity> for ReportLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => ReportLevel::Warning,
            Severity::Error => ReportLevel::Error,
        }
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLevel::Info => write!(f, "Info"),
            ReportLevel::Warning => write!(f, "Warning"),
            ReportLevel::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug)]
struct ReportEntry {
    level: ReportLevel,
    address: String,
    line: usize,
    reason: String,
}

/// The full per-link report for one document.
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(inspection: Inspection) -> Self {
        let entries = match inspection {
            Inspection::NotMarkdown | Inspection::NoLinks => Vec::new(),
            Inspection::Links(verified) => verified.into_iter().map(entry_for).collect(),
        };
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.level == ReportLevel::Error)
            .count()
    }

    /// One formatted line per link, in document order.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{}: {} on line {}: {}",
                    entry.level,
                    entry.address,
                    entry.line + 1,
                    entry.reason
                )
            })
            .collect()
    }
}

fn entry_for(verified: LinkVerification) -> ReportEntry {
    let line = verified.link.line;
    let address = verified.link.address;

    if verified.findings.is_empty() {
        let reason = if is_ftp_link(&address) {
            "FTP link (not checked)"
        } else {
            "no problems found"
        };
        return ReportEntry {
            level: ReportLevel::Info,
            address,
            line,
            reason: reason.to_string(),
        };
    }

    let level = verified
        .findings
        .iter()
        .map(|finding| finding.severity)
        .max()
        .map(ReportLevel::from)
        .unwrap_or(ReportLevel::Info);
    let reason = verified
        .findings
        .iter()
        .map(|finding| finding.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    ReportEntry {
        level,
        address,
        line,
        reason,
    }
}
