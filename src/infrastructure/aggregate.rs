//! Finding aggregation
//!
//! Dedups, filters, orders, and truncates scored findings under the
//! externally supplied policy. Ordering is a deterministic total
//! order; truncation is always reported, never silent.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::finding::{Finding, Location};
use crate::domain::policy::{OrderedFindings, OrderingMode, ScanPolicy};
use crate::domain::value_objects::VulnerabilityClass;

/// Aggregate scored findings under the policy.
pub fn aggregate(findings: Vec<Finding>, policy: &ScanPolicy) -> OrderedFindings {
    let deduped = dedup(findings);

    let mut kept: Vec<Finding> = deduped
        .into_iter()
        .filter(|f| policy.include_sanitized || !f.sanitized)
        // Only a provably unreachable sink is suppressible; unknown
        // reachability always survives
        .filter(|f| policy.include_unreachable || f.reachable != Some(false))
        .filter(|f| match policy.min_confidence {
            Some(min) => f.confidence.value() >= min,
            None => true,
        })
        .collect();

    sort(&mut kept, policy.ordering);

    let total = kept.len();
    let truncated = match policy.max_findings {
        Some(max) if total > max => {
            kept.truncate(max);
            true
        }
        _ => false,
    };

    debug!(total, truncated, returned = kept.len(), "findings aggregated");

    OrderedFindings {
        findings: kept,
        truncated,
        total,
    }
}

/// Keep the highest-confidence finding per `(location, class)`.
fn dedup(findings: Vec<Finding>) -> Vec<Finding> {
    let mut best: HashMap<(Location, VulnerabilityClass), Finding> = HashMap::new();
    for finding in findings {
        let key = (finding.location.clone(), finding.vulnerability_class);
        match best.get_mut(&key) {
            Some(existing) => {
                if finding.confidence.value() > existing.confidence.value() {
                    *existing = finding;
                }
            }
            None => {
                best.insert(key, finding);
            }
        }
    }
    best.into_values().collect()
}

fn sort(findings: &mut [Finding], mode: OrderingMode) {
    findings.sort_by(|a, b| {
        let by_severity = b.severity.rank().cmp(&a.severity.rank());
        let by_confidence = b.confidence.value().total_cmp(&a.confidence.value());
        let primary = match mode {
            OrderingMode::SeverityFirst => by_severity.then(by_confidence),
            OrderingMode::ConfidenceFirst => by_confidence.then(by_severity),
        };
        primary
            .then_with(|| a.location.sort_key().cmp(&b.location.sort_key()))
            .then_with(|| a.vulnerability_class.cmp(&b.vulnerability_class))
    });
}
