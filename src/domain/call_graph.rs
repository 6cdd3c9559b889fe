//! Call graph input types
//!
//! The call graph is supplied by an external import/call resolver and
//! consumed read-only: edges drive interprocedural propagation, the
//! resolved set drives three-valued reachability.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::finding::Location;

/// One resolved call edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphEdge {
    /// Function id of the caller (`file::name`)
    pub caller: String,
    /// Function id of the callee
    pub callee: String,
    /// Location of the call expression inside the caller
    pub call_site: Location,
}

/// Kind of program entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointKind {
    HttpHandler,
    CliMain,
    MessageConsumer,
    ScheduledJob,
    Other,
}

/// An externally supplied program entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub function_id: String,
    pub kind: EntryPointKind,
    /// Whether the entry point's parameters carry untrusted data
    /// (e.g. HTTP handler arguments); such parameters are treated as
    /// taint sources
    #[serde(default)]
    pub taints_parameters: bool,
}

/// Call-graph data for one scan; may be partial.
///
/// `resolved` names the functions the external resolver fully
/// processed. A function absent from it has unknown callers/callees,
/// so reachability for sinks inside it reports `None` rather than
/// `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallGraph {
    pub edges: Vec<CallGraphEdge>,
    #[serde(default)]
    pub resolved: BTreeSet<String>,
}

impl CallGraph {
    pub fn new(edges: Vec<CallGraphEdge>, resolved: BTreeSet<String>) -> Self {
        Self { edges, resolved }
    }

    /// Empty graph: every function degrades to intraprocedural-only
    /// analysis and reachability is unknown everywhere.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self, function_id: &str) -> bool {
        self.resolved.contains(function_id)
    }

    /// Forward adjacency (caller -> callees), deterministic order.
    pub fn adjacency(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut adj: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in &self.edges {
            adj.entry(edge.caller.as_str())
                .or_default()
                .insert(edge.callee.as_str());
        }
        adj
    }

    /// Callee candidates for a call site, matched on caller id and call
    /// line. Multiple candidates (dynamic dispatch) are all returned,
    /// sorted for determinism.
    pub fn callees_at(&self, caller: &str, line: u32) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .edges
            .iter()
            .filter(|e| e.caller == caller && e.call_site.line == line)
            .map(|e| e.callee.as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}
