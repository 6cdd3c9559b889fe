//! Interprocedural extension
//!
//! Composes per-function taint signatures across the externally
//! supplied call graph, then re-walks every function with the composed
//! summaries so flows spanning function and file boundaries are
//! synthesized.
//!
//! Composition is round-based: each round lets taint facts travel one
//! call edge further, so `max_call_depth` rounds bound the traversal
//! on recursive call graphs. Functions missing from the call graph
//! degrade gracefully to intraprocedural-only analysis.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::call_graph::{CallGraph, EntryPoint};
use crate::domain::catalog::Catalog;
use crate::domain::finding::CandidateFlow;
use crate::domain::normalized::NormalizedNode;
use crate::domain::taint::SignatureMap;
use crate::domain::value_objects::Language;

use super::intraproc::{analyze_module, WalkContext};

/// One successfully normalized file, retained for the signature rounds
#[derive(Debug, Clone)]
pub struct FileModule {
    pub file: String,
    pub language: Language,
    pub root: NormalizedNode,
}

/// Result of full propagation over a batch of files
#[derive(Debug, Clone)]
pub struct PropagationResult {
    pub flows: Vec<CandidateFlow>,
    pub signatures: SignatureMap,
}

/// Propagate taint across all files and call edges.
///
/// `modules` must already be sorted by file path; walk order is part of
/// the determinism contract.
pub fn propagate_across_calls(
    modules: &[FileModule],
    catalog: &Catalog,
    call_graph: &CallGraph,
    entry_points: &[EntryPoint],
    max_call_depth: u32,
) -> PropagationResult {
    let untrusted_param_fns: BTreeSet<String> = entry_points
        .iter()
        .filter(|ep| ep.taints_parameters)
        .map(|ep| ep.function_id.clone())
        .collect();

    // Signature rounds: iterate until the summaries stop changing or
    // the depth bound is reached. Round N lets a parameter-to-sink
    // fact cross N call edges.
    let mut summaries = SignatureMap::new();
    for round in 0..=max_call_depth {
        let (next, _) = walk_all(
            modules,
            catalog,
            call_graph,
            &summaries,
            max_call_depth,
            &untrusted_param_fns,
        );
        let stable = next == summaries;
        summaries = next;
        if stable {
            debug!(round, "taint signatures reached fixpoint");
            break;
        }
    }

    // Final pass emits the flows under the composed summaries
    let (signatures, flows) = walk_all(
        modules,
        catalog,
        call_graph,
        &summaries,
        max_call_depth,
        &untrusted_param_fns,
    );

    debug!(
        functions = signatures.len(),
        flows = flows.len(),
        "interprocedural propagation complete"
    );

    PropagationResult { flows, signatures }
}

fn walk_all(
    modules: &[FileModule],
    catalog: &Catalog,
    call_graph: &CallGraph,
    summaries: &SignatureMap,
    max_call_depth: u32,
    untrusted_param_fns: &BTreeSet<String>,
) -> (SignatureMap, Vec<CandidateFlow>) {
    let mut next = SignatureMap::new();
    let mut flows = Vec::new();

    for module in modules {
        let ctx = WalkContext {
            catalog,
            language: module.language,
            file: &module.file,
            call_graph,
            summaries,
            max_call_depth,
            untrusted_param_fns,
        };
        for outcome in analyze_module(&module.root, &ctx) {
            flows.extend(outcome.flows);
            next.insert(outcome.signature.function_id.clone(), outcome.signature);
        }
    }

    (next, flows)
}
