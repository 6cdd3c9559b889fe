//! taintflow - polyglot taint-flow analysis engine
//!
//! Finds security-sensitive data flows from untrusted sources to
//! dangerous sinks across source files in multiple languages,
//! classifies each flow by vulnerability class and severity, and
//! scores confidence to suppress false positives.
//!
//! ## Features
//!
//! - Versioned sink/source/sanitizer catalog with organization overlays
//! - Language adapters lowering concrete syntax to one shared vocabulary
//! - Intra- and inter-procedural taint propagation over an external
//!   call graph, with bounded depth on recursive graphs
//! - Deterministic confidence scoring (path length, sanitizers, hops)
//! - Three-valued reachability from externally supplied entry points
//! - Policy-driven dedup, ordering, and honest truncation
//!
//! ## Usage
//!
//! ```no_run
//! use taintflow::TaintFlowEngine;
//! use taintflow::domain::call_graph::CallGraph;
//!
//! # async fn run() -> Result<(), taintflow::domain::catalog::CatalogError> {
//! let engine = TaintFlowEngine::new()?;
//! let outcome = engine.analyze(vec![], &CallGraph::empty(), &[]).await;
//! assert!(outcome.findings.findings.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Parsing, call-graph construction, and result shaping live in
//! external collaborators; this crate receives parsed trees and
//! returns ordered findings plus per-file diagnostics.

pub mod application;
pub mod domain;
pub mod engine;
pub mod infrastructure;

pub use engine::TaintFlowEngine;

// Re-export key types for composition root wiring
pub use application::use_cases::FileInput;
pub use domain::call_graph::{CallGraph, CallGraphEdge, EntryPoint, EntryPointKind};
pub use domain::catalog::{Catalog, CatalogEntry, CatalogError, CatalogKind, CatalogOverlay, Matcher};
pub use domain::finding::{CandidateFlow, Finding, FlowStep, FlowStepKind, Location};
pub use domain::policy::{
    Diagnostic, DiagnosticKind, EngineConfig, OrderedFindings, OrderingMode, ScanOutcome,
    ScanPolicy,
};
pub use domain::value_objects::{Confidence, Language, Severity, VulnerabilityClass};
