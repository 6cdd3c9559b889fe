//! Reachability annotation through the public engine surface

mod common;

use std::collections::BTreeSet;

use taintflow::{
    CallGraph, CallGraphEdge, EngineConfig, EntryPoint, EntryPointKind, Language, Location,
    ScanPolicy, TaintFlowEngine,
};

fn entry(id: &str) -> EntryPoint {
    EntryPoint {
        function_id: id.to_string(),
        kind: EntryPointKind::HttpHandler,
        taints_parameters: false,
    }
}

const VULNERABLE: &str = r#"
def helper():
    user = input()
    eval(user)
"#;

#[tokio::test]
async fn sink_reached_from_entry_point_is_marked_reachable() {
    let engine = TaintFlowEngine::new().unwrap();
    let graph = CallGraph::new(
        vec![CallGraphEdge {
            caller: "web.py::handler".to_string(),
            callee: "web.py::helper".to_string(),
            call_site: Location::new("web.py", 10),
        }],
        ["web.py::helper".to_string()].into_iter().collect(),
    );

    let outcome = engine
        .analyze(
            vec![common::parse(Language::Python, "web.py", VULNERABLE)],
            &graph,
            &[entry("web.py::handler")],
        )
        .await;

    assert_eq!(outcome.findings.findings.len(), 1);
    assert_eq!(outcome.findings.findings[0].reachable, Some(true));
}

#[tokio::test]
async fn unreached_resolved_sink_is_marked_unreachable_not_dropped() {
    let engine = TaintFlowEngine::new().unwrap();
    // Full data for helper, but no path from the entry point to it
    let graph = CallGraph::new(
        vec![],
        ["web.py::helper".to_string()].into_iter().collect(),
    );

    let outcome = engine
        .analyze(
            vec![common::parse(Language::Python, "web.py", VULNERABLE)],
            &graph,
            &[entry("web.py::other_handler")],
        )
        .await;

    assert_eq!(outcome.findings.findings.len(), 1);
    assert_eq!(outcome.findings.findings[0].reachable, Some(false));
}

#[tokio::test]
async fn partial_call_graph_reports_unknown_never_false() {
    let engine = TaintFlowEngine::new().unwrap();
    // helper is absent from the resolved set: the resolver never
    // finished it
    let graph = CallGraph::new(vec![], BTreeSet::new());

    let outcome = engine
        .analyze(
            vec![common::parse(Language::Python, "web.py", VULNERABLE)],
            &graph,
            &[entry("web.py::handler")],
        )
        .await;

    assert_eq!(outcome.findings.findings.len(), 1);
    assert_eq!(outcome.findings.findings[0].reachable, None);
}

#[tokio::test]
async fn no_entry_points_leaves_reachability_unknown() {
    let engine = TaintFlowEngine::new().unwrap();
    let outcome = engine
        .analyze(
            vec![common::parse(Language::Python, "web.py", VULNERABLE)],
            &CallGraph::empty(),
            &[],
        )
        .await;

    assert_eq!(outcome.findings.findings.len(), 1);
    assert_eq!(outcome.findings.findings[0].reachable, None);
}

#[tokio::test]
async fn unreachable_findings_suppressed_only_by_policy() {
    let source = VULNERABLE;
    let graph = || {
        CallGraph::new(
            vec![],
            ["web.py::helper".to_string()].into_iter().collect(),
        )
    };

    let keep = TaintFlowEngine::new().unwrap();
    let kept = keep
        .analyze(
            vec![common::parse(Language::Python, "web.py", source)],
            &graph(),
            &[entry("web.py::other")],
        )
        .await;
    assert_eq!(kept.findings.findings.len(), 1);

    let drop = TaintFlowEngine::with_config(
        EngineConfig::default(),
        ScanPolicy {
            include_unreachable: false,
            ..Default::default()
        },
    )
    .unwrap();
    let dropped = drop
        .analyze(
            vec![common::parse(Language::Python, "web.py", source)],
            &graph(),
            &[entry("web.py::other")],
        )
        .await;
    assert!(dropped.findings.findings.is_empty());
}
