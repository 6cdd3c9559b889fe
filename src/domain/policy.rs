//! Scan policy, engine configuration, and scan outputs
//!
//! The policy is supplied by the external tier/licensing collaborator;
//! the engine only honors it.

use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;
use super::finding::Finding;
use super::value_objects::Language;

/// Ordering mode for aggregated findings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingMode {
    /// Severity rank descending, then confidence descending
    #[default]
    SeverityFirst,
    /// Confidence descending, then severity rank descending
    ConfidenceFirst,
}

/// Externally supplied result-shaping policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPolicy {
    /// Cap on returned findings; exceeding it sets the truncation flag
    pub max_findings: Option<usize>,
    /// Keep findings whose sink is provably unreachable
    pub include_unreachable: bool,
    /// Keep findings whose flow passed through a sanitizer
    pub include_sanitized: bool,
    /// Drop findings below this confidence
    pub min_confidence: Option<f32>,
    pub ordering: OrderingMode,
    /// Organization catalog overlay entries, layered over the built-in
    /// catalog at engine construction
    pub overlay: Vec<CatalogEntry>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            max_findings: None,
            include_unreachable: true,
            include_sanitized: true,
            min_confidence: None,
            ordering: OrderingMode::SeverityFirst,
            overlay: Vec::new(),
        }
    }
}

/// Engine tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bound on interprocedural call depth; exceeding it truncates the
    /// branch and penalizes confidence instead of failing
    pub max_call_depth: u32,
    /// Maximum concurrent per-file analyses
    pub max_concurrent_files: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 10,
            max_concurrent_files: 4,
        }
    }
}

/// Kind of per-file failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnsupportedLanguage,
    MalformedTree,
}

/// Per-file failure report. One file's failure never aborts the batch;
/// it contributes a diagnostic and an empty finding set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub language: Option<Language>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Ordered, deduped, possibly truncated finding set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedFindings {
    pub findings: Vec<Finding>,
    /// Set when `max_findings` cut the list; never a silent drop
    pub truncated: bool,
    /// Deduped candidate count before truncation
    pub total: usize,
}

/// Full result of one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub findings: OrderedFindings,
    pub diagnostics: Vec<Diagnostic>,
    pub files_analyzed: usize,
}
