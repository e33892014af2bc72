// src/analysis/aggregate.rs
// =============================================================================
// This module joins per-link check outcomes into the finding set that gets
// published for one analysis request.
//
// Three jobs:
// - drop the "no finding" entries
// - keep order stable relative to extraction order
// - deduplicate identical (range, message) pairs, which show up when more
//   than one check targets the same link span
// =============================================================================

use std::collections::HashSet;

use super::verify::Finding;

// Merges the complete fan-out result for one request. `outcomes` holds one
// inner vector per link, in extraction order.
pub fn merge_outcomes(outcomes: Vec<Vec<Option<Finding>>>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for finding in outcomes.into_iter().flatten().flatten() {
        let key = (finding.range, finding.message.clone());
        if seen.insert(key) {
            merged.push(finding);
        }
    }
    merged
}
