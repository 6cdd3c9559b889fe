//! Taint tracking types
//!
//! Values tracked through one function's scope and the per-function
//! summaries that carry taint behavior across function boundaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;
use super::finding::{FlowStep, Location};

/// Where a tracked taint value originated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaintOrigin {
    /// A concrete source expression matched a catalog entry (or an
    /// entry-point parameter declared untrusted)
    Source {
        location: Location,
        entry_id: String,
    },
    /// Symbolic taint seeded on a parameter while computing the
    /// enclosing function's taint signature
    Parameter { index: usize },
}

/// A value currently carrying taint.
///
/// Created when a source expression is evaluated, propagated by
/// assignment and argument binding, discarded when the enclosing
/// function's analysis completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaintValue {
    pub origin: TaintOrigin,
    /// Ordered steps from the origin to the current program point
    pub path: Vec<FlowStep>,
    /// Catalog ids of sanitizers this value passed through
    pub sanitizers: Vec<String>,
    /// Function boundaries crossed so far
    pub hops: u32,
    /// Set when the call-depth bound truncated exploration upstream
    pub depth_truncated: bool,
}

impl TaintValue {
    pub fn from_source(location: Location, entry_id: impl Into<String>, step: FlowStep) -> Self {
        Self {
            origin: TaintOrigin::Source {
                location,
                entry_id: entry_id.into(),
            },
            path: vec![step],
            sanitizers: Vec::new(),
            hops: 0,
            depth_truncated: false,
        }
    }

    pub fn from_parameter(index: usize, step: FlowStep) -> Self {
        Self {
            origin: TaintOrigin::Parameter { index },
            path: vec![step],
            sanitizers: Vec::new(),
            hops: 0,
            depth_truncated: false,
        }
    }

    /// Extend the path with a propagation step.
    pub fn stepped(mut self, step: FlowStep) -> Self {
        self.path.push(step);
        self
    }

    /// Record a sanitizer interposition. Taint keeps propagating so
    /// sanitized flows can surface at reduced confidence; the
    /// aggregator decides whether they are reported.
    pub fn sanitized(mut self, sanitizer_id: impl Into<String>, step: FlowStep) -> Self {
        self.path.push(step);
        self.sanitizers.push(sanitizer_id.into());
        self
    }

    pub fn is_sanitized(&self) -> bool {
        !self.sanitizers.is_empty()
    }

    /// Deterministically merge two taint values reaching the same
    /// variable (conditional join): keep the one whose origin sorts
    /// first by location, preferring unsanitized taint so recall is
    /// not lost at joins.
    pub fn merge(self, other: TaintValue) -> TaintValue {
        match (self.is_sanitized(), other.is_sanitized()) {
            (false, true) => return self,
            (true, false) => return other,
            _ => {}
        }
        let self_key = origin_sort_key(&self.origin);
        let other_key = origin_sort_key(&other.origin);
        if self_key <= other_key { self } else { other }
    }
}

fn origin_sort_key(origin: &TaintOrigin) -> (u8, String, u32, u32, usize) {
    match origin {
        TaintOrigin::Source { location, .. } => (
            0,
            location.file_path.clone(),
            location.line,
            location.column.unwrap_or(0),
            0,
        ),
        TaintOrigin::Parameter { index } => (1, String::new(), 0, 0, *index),
    }
}

/// A parameter-to-sink flow recorded in a taint signature.
///
/// `function_id` names the function containing the actual sink, which
/// differs from the summarized function once signatures are composed
/// across call edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkReach {
    pub sink_entry: CatalogEntry,
    pub sink_location: Location,
    pub function_id: String,
    /// Steps from the parameter to the sink
    pub local_path: Vec<FlowStep>,
    pub sanitizers: Vec<String>,
    pub hops: u32,
    pub depth_truncated: bool,
}

/// A parameter-to-return flow recorded in a taint signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnFlow {
    pub path: Vec<FlowStep>,
    pub sanitizers: Vec<String>,
    pub hops: u32,
    pub depth_truncated: bool,
}

/// A source-to-return flow: the function's return value is inherently
/// tainted (it reads untrusted input itself or transitively)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSource {
    pub origin_location: Location,
    pub entry_id: String,
    pub path: Vec<FlowStep>,
    pub sanitizers: Vec<String>,
    pub hops: u32,
    pub depth_truncated: bool,
}

/// Summary of one function's externally visible taint behavior.
///
/// Computed intraprocedurally, composed across call-graph edges by the
/// interprocedural extension, and consulted when the function is
/// called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaintSignature {
    pub function_id: String,
    /// Parameter positions flowing into sinks, with the reached sinks
    pub params_to_sinks: BTreeMap<usize, Vec<SinkReach>>,
    /// Parameter positions flowing to the return value
    pub params_to_return: BTreeMap<usize, ReturnFlow>,
    /// Source-derived taint on the return value, if any
    pub returns_source: Option<ReturnSource>,
}

impl TaintSignature {
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            ..Default::default()
        }
    }

    /// True when the signature exposes no taint behavior at all.
    pub fn is_neutral(&self) -> bool {
        self.params_to_sinks.is_empty()
            && self.params_to_return.is_empty()
            && self.returns_source.is_none()
    }
}

/// All function signatures of a scan, keyed by function id.
///
/// A `BTreeMap` so composition iterates in a deterministic order.
pub type SignatureMap = BTreeMap<String, TaintSignature>;
