//! Reachability analysis
//!
//! Marks each finding's sink as reachable from the externally supplied
//! entry points, using the call graph. Three-valued: `Some(false)` is
//! only asserted when the resolver fully processed the sink's
//! function; partial data yields `None`. Unreachable findings are
//! annotated, never dropped here.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::call_graph::{CallGraph, EntryPoint};
use crate::domain::finding::Finding;

/// Annotate findings in place. `sink_functions` pairs each finding
/// with the id of the function containing its sink, in the same order.
pub fn mark_reachability(
    findings: &mut [Finding],
    sink_functions: &[String],
    entry_points: &[EntryPoint],
    call_graph: &CallGraph,
) {
    debug_assert_eq!(findings.len(), sink_functions.len());

    if entry_points.is_empty() {
        // No entry-point data: reachability is unknown everywhere
        return;
    }

    let reached = reachable_set(entry_points, call_graph);
    let mut marked = 0usize;

    for (finding, sink_fn) in findings.iter_mut().zip(sink_functions) {
        if reached.contains(sink_fn.as_str()) {
            finding.reachable = Some(true);
        } else if call_graph.is_resolved(sink_fn) {
            finding.reachable = Some(false);
        } else {
            // Partial call-graph data for this function: unknown, not false
            finding.reachable = None;
        }
        marked += 1;
    }

    debug!(marked, entry_points = entry_points.len(), "reachability marked");
}

/// BFS over forward call edges from every entry point.
fn reachable_set<'g>(entry_points: &'g [EntryPoint], call_graph: &'g CallGraph) -> BTreeSet<&'g str> {
    let adjacency = call_graph.adjacency();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut queue: Vec<&str> = entry_points
        .iter()
        .map(|ep| ep.function_id.as_str())
        .collect();

    while let Some(current) = queue.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(callees) = adjacency.get(current) {
            for callee in callees {
                if !visited.contains(callee) {
                    queue.push(callee);
                }
            }
        }
    }

    visited
}
