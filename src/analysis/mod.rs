// src/analysis/mod.rs
// =============================================================================
// This module contains the whole link-analysis pipeline.
//
// Submodules:
// - extract: parses links out of document lines with positions
// - classify: pure predicates over link addresses
// - verify: the per-link checks (locale, reachability, local path)
// - aggregate: joins check outcomes into one deduplicated finding set
// - coordinator: fan-out/join and revision-guarded publishing
//
// This file re-exports the surface the rest of the application uses.
// =============================================================================

mod aggregate;
mod classify;
mod coordinator;
mod extract;
mod verify;

#[cfg(test)]
pub mod testutil;

pub use classify::is_ftp_link;
pub use coordinator::{
    AnalysisCoordinator, AnalysisOutcome, Inspection, LinkVerification, Presentation,
};
pub use verify::{Finding, LocalFiles, Severity};
