//! Confidence scoring and classification
//!
//! Turns a candidate flow into a finding. The score is a pure function
//! of the flow and its matched sink entry: identical inputs always
//! produce identical findings.

use crate::domain::finding::{CandidateFlow, Finding};
use crate::domain::value_objects::Confidence;

/// Path steps granted before the length discount starts.
const PATH_LENGTH_GRACE: usize = 3;
/// Discount per path step beyond the grace window.
const PATH_STEP_FACTOR: f32 = 0.97;
/// Floor for the accumulated length discount.
const PATH_LENGTH_FLOOR: f32 = 0.6;
/// Sharp discount when any sanitizer is interposed. Nonzero: policy
/// may still surface sanitized findings.
const SANITIZER_FACTOR: f32 = 0.25;
/// Discount per interprocedural hop, reflecting resolution uncertainty.
const HOP_FACTOR: f32 = 0.9;
/// Discount when call-depth bounding truncated exploration.
const DEPTH_TRUNCATION_FACTOR: f32 = 0.75;

/// Score a candidate flow into a finding.
///
/// Class and severity are copied from the matched sink entry; the
/// confidence starts at the sink's base confidence and is adjusted by
/// bounded multiplicative factors, so the result stays in `[0, 1]`.
pub fn score(flow: &CandidateFlow) -> Finding {
    let entry = &flow.sink_entry;

    let mut confidence = Confidence::new(entry.base_confidence);
    confidence = confidence.scale(path_length_factor(flow.path.len()));
    if !flow.sanitizers.is_empty() {
        confidence = confidence.scale(SANITIZER_FACTOR);
    }
    for _ in 0..flow.hops {
        confidence = confidence.scale(HOP_FACTOR);
    }
    if flow.depth_truncated {
        confidence = confidence.scale(DEPTH_TRUNCATION_FACTOR);
    }

    let class = entry.vulnerability_class;
    Finding {
        id: format!(
            "{}-{}-{}",
            class.slug(),
            flow.sink_location.file_path,
            flow.sink_location.line
        ),
        vulnerability_class: class,
        severity: entry.severity,
        confidence,
        location: flow.sink_location.clone(),
        taint_path: flow.path.clone(),
        sanitized: !flow.sanitizers.is_empty(),
        reachable: None,
        description: if entry.description.is_empty() {
            format!("Tainted data reaches {}", entry.id)
        } else {
            format!("Tainted data reaches {}: {}", entry.id, entry.description)
        },
        recommendation: Some(format!(
            "Validate or sanitize the value before it reaches {} ({}, {})",
            entry.matcher.callee,
            class.cwe_id(),
            class.owasp_category(),
        )),
    }
}

fn path_length_factor(len: usize) -> f32 {
    let extra = len.saturating_sub(PATH_LENGTH_GRACE) as i32;
    PATH_STEP_FACTOR.powi(extra).max(PATH_LENGTH_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogEntry, CatalogKind, Matcher};
    use crate::domain::finding::{FlowStep, FlowStepKind, Location};
    use crate::domain::value_objects::{Language, Severity, VulnerabilityClass};

    fn sink_entry(base: f32) -> CatalogEntry {
        CatalogEntry {
            id: "python-db-execute".to_string(),
            language: Language::Python,
            kind: CatalogKind::Sink,
            matcher: Matcher::callee("execute"),
            vulnerability_class: VulnerabilityClass::SqlInjection,
            severity: Severity::Critical,
            base_confidence: base,
            description: String::new(),
        }
    }

    fn flow(path_len: usize, sanitizers: Vec<String>, hops: u32, truncated: bool) -> CandidateFlow {
        let step = |line| FlowStep {
            kind: FlowStepKind::Propagation,
            expression: "x".to_string(),
            file: "t.py".to_string(),
            line,
            column: 0,
            note: None,
        };
        CandidateFlow {
            source_location: Location::new("t.py", 1),
            sink_location: Location::new("t.py", 9),
            sink_entry: sink_entry(0.9),
            function_id: "t.py::<module>".to_string(),
            path: (1..=path_len as u32).map(step).collect(),
            sanitizers,
            hops,
            depth_truncated: truncated,
        }
    }

    #[test]
    fn direct_flow_scores_at_base_confidence() {
        let finding = score(&flow(3, vec![], 0, false));
        assert_eq!(finding.confidence.value(), 0.9);
        assert_eq!(finding.vulnerability_class, VulnerabilityClass::SqlInjection);
        assert_eq!(finding.severity, Severity::Critical);
        assert!(!finding.sanitized);
        assert_eq!(finding.id, "sql-injection-t.py-9");
    }

    #[test]
    fn sanitizer_reduces_sharply_but_not_to_zero() {
        let clean = score(&flow(3, vec![], 0, false));
        let sanitized = score(&flow(3, vec!["escape".to_string()], 0, false));
        assert!(sanitized.confidence.value() < clean.confidence.value());
        assert!(sanitized.confidence.value() > 0.0);
        assert!(sanitized.sanitized);
    }

    #[test]
    fn longer_paths_score_lower_with_floor() {
        let short = score(&flow(3, vec![], 0, false));
        let long = score(&flow(10, vec![], 0, false));
        let very_long = score(&flow(400, vec![], 0, false));
        assert!(long.confidence.value() < short.confidence.value());
        // Floor keeps extremely long paths from vanishing
        assert!(very_long.confidence.value() >= 0.9 * PATH_LENGTH_FLOOR - f32::EPSILON);
    }

    #[test]
    fn each_hop_discounts() {
        let none = score(&flow(4, vec![], 0, false));
        let one = score(&flow(4, vec![], 1, false));
        let two = score(&flow(4, vec![], 2, false));
        assert!(one.confidence.value() < none.confidence.value());
        assert!(two.confidence.value() < one.confidence.value());
    }

    #[test]
    fn depth_truncation_discounts() {
        let normal = score(&flow(4, vec![], 1, false));
        let truncated = score(&flow(4, vec![], 1, true));
        assert!(truncated.confidence.value() < normal.confidence.value());
    }

    #[test]
    fn scoring_is_deterministic() {
        let f = flow(6, vec!["escape".to_string()], 2, true);
        let a = score(&f);
        let b = score(&f);
        assert_eq!(a.confidence.value(), b.confidence.value());
        assert_eq!(a.id, b.id);
    }
}
