//! Finding types
//!
//! Core types for security findings, locations, and taint paths.

use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;
use super::value_objects::{Confidence, Severity, VulnerabilityClass};

/// Location of a node or finding in source code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub file_path: String,
    pub line: u32,
    pub column: Option<u32>,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

impl Location {
    pub fn new(file_path: impl Into<String>, line: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column: None,
            end_line: None,
            end_column: None,
        }
    }

    pub fn with_columns(mut self, column: u32, end_column: u32) -> Self {
        self.column = Some(column);
        self.end_column = Some(end_column);
        self
    }

    pub fn with_end_line(mut self, end_line: u32) -> Self {
        self.end_line = Some(end_line);
        self
    }

    /// Key used for deterministic ordering: file, then line, then column.
    pub fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file_path, self.line, self.column.unwrap_or(0))
    }
}

/// Kind of step in a taint path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowStepKind {
    /// Taint source (entry point of untrusted data)
    Source,
    /// Taint propagation through an assignment or expression
    Propagation,
    /// Sanitization (taint neutralized, confidence reduced)
    Sanitizer,
    /// Crossing a function boundary through a call
    Call,
    /// Taint sink (dangerous operation)
    Sink,
}

/// A step in a taint path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowStep {
    pub kind: FlowStepKind,
    /// Expression or variable at this step
    pub expression: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub note: Option<String>,
}

impl FlowStep {
    pub fn new(
        kind: FlowStepKind,
        expression: impl Into<String>,
        location: &Location,
        note: Option<String>,
    ) -> Self {
        Self {
            kind,
            expression: expression.into(),
            file: location.file_path.clone(),
            line: location.line,
            column: location.column.unwrap_or(0),
            note,
        }
    }
}

/// A candidate source-to-sink flow, produced by the propagation engines
/// and consumed by confidence scoring.
///
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFlow {
    pub source_location: Location,
    pub sink_location: Location,
    /// The matched sink catalog entry
    pub sink_entry: CatalogEntry,
    /// Function containing the sink call (used by reachability)
    pub function_id: String,
    /// Ordered steps from source to sink
    pub path: Vec<FlowStep>,
    /// Catalog ids of sanitizers interposed on the path
    pub sanitizers: Vec<String>,
    /// Interprocedural hops crossed between source and sink
    pub hops: u32,
    /// Set when call-depth bounding truncated exploration of this flow
    pub depth_truncated: bool,
}

/// Security finding, the final output unit of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub vulnerability_class: VulnerabilityClass,
    pub severity: Severity,
    pub confidence: Confidence,
    /// Sink location
    pub location: Location,
    /// Ordered steps the tainted value passed through
    pub taint_path: Vec<FlowStep>,
    /// Whether a sanitizer was interposed between source and sink
    pub sanitized: bool,
    /// Three-valued reachability: `None` when call-graph data for the
    /// sink's function is partial or unavailable
    pub reachable: Option<bool>,
    pub description: String,
    pub recommendation: Option<String>,
}
