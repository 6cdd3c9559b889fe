//! Intraprocedural taint engine
//!
//! Walks one function's normalized body top-down, maintaining a
//! variable-to-taint environment. Branches of a conditional are both
//! visited and their taint states unioned at the join (recall over
//! precision); loops are traversed once, no fixpoint.
//!
//! Each walk produces the function's candidate flows plus its taint
//! signature. When the walk is handed composed summaries of other
//! functions (see `interproc`), calls to known callees resolve through
//! their signatures instead of the conservative fallthrough.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::call_graph::CallGraph;
use crate::domain::catalog::{Catalog, CatalogEntry, CatalogKind};
use crate::domain::finding::{CandidateFlow, FlowStep, FlowStepKind, Location};
use crate::domain::normalized::{Callee, NodeKind, NormalizedNode};
use crate::domain::taint::{
    ReturnFlow, ReturnSource, SignatureMap, SinkReach, TaintOrigin, TaintSignature, TaintValue,
};
use crate::domain::value_objects::Language;

/// Catalog entry id used for parameters of entry points declared to
/// carry untrusted data.
pub const UNTRUSTED_PARAMETER: &str = "entry-point-parameter";

/// Shared inputs for walking the functions of one file
pub struct WalkContext<'a> {
    pub catalog: &'a Catalog,
    pub language: Language,
    pub file: &'a str,
    pub call_graph: &'a CallGraph,
    /// Composed signatures of other functions; empty on the first pass
    pub summaries: &'a SignatureMap,
    pub max_call_depth: u32,
    /// Functions whose parameters are declared untrusted sources
    pub untrusted_param_fns: &'a BTreeSet<String>,
}

/// Result of walking one function
#[derive(Debug, Clone)]
pub struct FunctionOutcome {
    pub signature: TaintSignature,
    pub flows: Vec<CandidateFlow>,
}

/// Walk every function of a normalized module root.
pub fn analyze_module(root: &NormalizedNode, ctx: &WalkContext<'_>) -> Vec<FunctionOutcome> {
    root.functions()
        .map(|function| analyze_function(function, ctx))
        .collect()
}

/// Walk a single function.
pub fn analyze_function(function: &NormalizedNode, ctx: &WalkContext<'_>) -> FunctionOutcome {
    let name = function.name.as_deref().unwrap_or("<anon>");
    let function_id = super::adapters::function_id(ctx.file, name);

    let mut walker = FunctionWalker {
        ctx,
        signature: TaintSignature::new(function_id.clone()),
        function_id,
        env: BTreeMap::new(),
        flows: Vec::new(),
    };
    walker.run(function);

    FunctionOutcome {
        signature: walker.signature,
        flows: walker.flows,
    }
}

struct FunctionWalker<'a> {
    ctx: &'a WalkContext<'a>,
    function_id: String,
    /// Variable name -> current taint, scoped to this function
    env: BTreeMap<String, TaintValue>,
    signature: TaintSignature,
    flows: Vec<CandidateFlow>,
}

impl<'a> FunctionWalker<'a> {
    fn run(&mut self, function: &NormalizedNode) {
        let untrusted = self.ctx.untrusted_param_fns.contains(&self.function_id);

        let mut param_index = 0usize;
        for child in &function.children {
            if child.kind != NodeKind::Parameter {
                continue;
            }
            let Some(name) = &child.name else { continue };
            let step = FlowStep::new(
                if untrusted {
                    FlowStepKind::Source
                } else {
                    FlowStepKind::Propagation
                },
                name.clone(),
                &child.location,
                Some(format!("parameter {}", name)),
            );
            let taint = if untrusted {
                TaintValue::from_source(child.location.clone(), UNTRUSTED_PARAMETER, step)
            } else {
                TaintValue::from_parameter(param_index, step)
            };
            self.env.insert(name.clone(), taint);
            param_index += 1;
        }

        for child in &function.children {
            if child.kind != NodeKind::Parameter {
                self.exec(child);
            }
        }
        // Scope exit: the environment dies here; only the signature
        // (and emitted flows) survive the function.
    }

    fn exec(&mut self, node: &NormalizedNode) {
        match node.kind {
            NodeKind::Assignment => {
                self.exec_assignment(node);
            }
            NodeKind::Conditional => self.exec_conditional(node),
            NodeKind::Loop | NodeKind::Block => {
                for child in &node.children {
                    self.exec(child);
                }
            }
            NodeKind::Return => {
                if let Some(expr) = node.children.first() {
                    if let Some(taint) = self.eval(expr) {
                        self.record_return(taint, &node.location);
                    }
                }
            }
            NodeKind::Call | NodeKind::Expr => {
                self.eval(node);
            }
            NodeKind::Identifier | NodeKind::Literal | NodeKind::Parameter => {}
            NodeKind::Function | NodeKind::Module => {
                // Adapters hoist definitions; nothing to do inline
            }
        }
    }

    fn exec_assignment(&mut self, node: &NormalizedNode) -> Option<TaintValue> {
        let name = node.name.clone()?;
        let taint = node.children.first().and_then(|rhs| self.eval(rhs));
        match taint {
            Some(t) => {
                let stepped = t.stepped(FlowStep::new(
                    FlowStepKind::Propagation,
                    name.clone(),
                    &node.location,
                    None,
                ));
                self.env.insert(name, stepped.clone());
                Some(stepped)
            }
            None => {
                // Last write wins: an untainted right-hand side clears
                self.env.remove(&name);
                None
            }
        }
    }

    /// Both arms are visited from the same pre-state and the resulting
    /// environments unioned, together with the fall-through state (a
    /// taint cleared inside one branch stays set at the join).
    fn exec_conditional(&mut self, node: &NormalizedNode) {
        let mut branches = node.children.iter();
        if let Some(cond) = branches.next() {
            self.eval(cond);
        }

        let base = self.env.clone();
        let mut joined = base.clone();
        for branch in branches {
            self.env = base.clone();
            self.exec(branch);
            let branch_env = std::mem::take(&mut self.env);
            for (name, taint) in branch_env {
                joined
                    .entry(name)
                    .and_modify(|existing| *existing = existing.clone().merge(taint.clone()))
                    .or_insert(taint);
            }
        }
        self.env = joined;
    }

    fn eval(&mut self, node: &NormalizedNode) -> Option<TaintValue> {
        match node.kind {
            NodeKind::Identifier => node.name.as_ref().and_then(|n| self.env.get(n)).cloned(),
            NodeKind::Literal => None,
            NodeKind::Call => self.eval_call(node),
            NodeKind::Assignment => self.exec_assignment(node),
            _ => self.eval_union(&node.children),
        }
    }

    fn eval_union(&mut self, nodes: &[NormalizedNode]) -> Option<TaintValue> {
        let mut result: Option<TaintValue> = None;
        for child in nodes {
            if let Some(taint) = self.eval(child) {
                result = Some(match result {
                    Some(existing) => existing.merge(taint),
                    None => taint,
                });
            }
        }
        result
    }

    fn eval_call(&mut self, call: &NormalizedNode) -> Option<TaintValue> {
        // Receiver and other non-argument subexpressions
        let recv_taint = self.eval_union(&call.children);
        let arg_taints: Vec<Option<TaintValue>> =
            call.args.iter().map(|arg| self.eval(arg)).collect();

        let Some(callee) = &call.callee else {
            // Computed callee: only the conservative union survives
            return self.conservative_result(recv_taint, arg_taints, "<dynamic call>", &call.location);
        };
        let receiver = callee.receiver.as_deref();
        let expr = callee.dotted();
        let location = &call.location;

        // Sinks first: a sanitizer or source result never un-reports a
        // tainted argument already handed to this call
        let sink_entries =
            self.ctx
                .catalog
                .lookup(self.ctx.language, CatalogKind::Sink, &callee.name, receiver);
        for entry in &sink_entries {
            for arg in arg_taints.iter().flatten() {
                self.record_sink_hit(entry, arg, location, &expr);
            }
        }

        let sanitizer_entries = self.ctx.catalog.lookup(
            self.ctx.language,
            CatalogKind::Sanitizer,
            &callee.name,
            receiver,
        );
        if let Some(entry) = best_entry(&sanitizer_entries) {
            let input = merge_all(recv_taint, arg_taints);
            return input.map(|t| {
                t.sanitized(
                    entry.id.clone(),
                    FlowStep::new(
                        FlowStepKind::Sanitizer,
                        expr.clone(),
                        location,
                        Some(format!("sanitized by {}", entry.id)),
                    ),
                )
            });
        }

        let source_entries = self.ctx.catalog.lookup(
            self.ctx.language,
            CatalogKind::Source,
            &callee.name,
            receiver,
        );
        if let Some(entry) = best_entry(&source_entries) {
            return Some(TaintValue::from_source(
                location.clone(),
                entry.id.clone(),
                FlowStep::new(
                    FlowStepKind::Source,
                    expr.clone(),
                    location,
                    Some(format!("tainted by {}", entry.id)),
                ),
            ));
        }

        // Resolve through the call graph; all candidates of a dynamic
        // call site contribute
        let candidates = self
            .ctx
            .call_graph
            .callees_at(&self.function_id, location.line);
        let known: Vec<&TaintSignature> = candidates
            .iter()
            .filter_map(|id| self.ctx.summaries.get(*id))
            .collect();

        if !known.is_empty() {
            let mut result: Option<TaintValue> = None;
            for summary in known {
                if let Some(t) = self.apply_summary(summary, &arg_taints, callee, location) {
                    result = Some(match result {
                        Some(existing) => existing.merge(t),
                        None => t,
                    });
                }
            }
            return result;
        }

        // Unknown callee: call-graph data is missing, degrade to the
        // conservative propagate-through
        self.conservative_result(recv_taint, arg_taints, &expr, location)
    }

    /// Taint behavior of a call resolved through a composed signature.
    fn apply_summary(
        &mut self,
        summary: &TaintSignature,
        arg_taints: &[Option<TaintValue>],
        callee: &Callee,
        location: &Location,
    ) -> Option<TaintValue> {
        let bridge = FlowStep::new(
            FlowStepKind::Call,
            callee.dotted(),
            location,
            Some(format!("into {}", summary.function_id)),
        );

        // Arguments reaching sinks inside (or below) the callee
        for (index, reaches) in &summary.params_to_sinks {
            let Some(Some(arg)) = arg_taints.get(*index) else {
                continue;
            };
            for reach in reaches {
                self.record_bridged_sink(arg, reach, &bridge);
            }
        }

        let mut result: Option<TaintValue> = None;

        // Arguments flowing to the callee's return value
        for (index, ret) in &summary.params_to_return {
            let Some(Some(arg)) = arg_taints.get(*index) else {
                continue;
            };
            let hops = arg.hops + ret.hops + 1;
            let mut t = arg.clone();
            t.path.push(bridge.clone());
            t.path.extend(ret.path.iter().cloned());
            t.sanitizers.extend(ret.sanitizers.iter().cloned());
            t.hops = hops;
            t.depth_truncated |= ret.depth_truncated || hops > self.ctx.max_call_depth;
            result = Some(match result {
                Some(existing) => existing.merge(t),
                None => t,
            });
        }

        // Return value inherently tainted (source inside the callee)
        if let Some(rs) = &summary.returns_source {
            let hops = rs.hops + 1;
            let mut path = rs.path.clone();
            path.push(FlowStep::new(
                FlowStepKind::Call,
                callee.dotted(),
                location,
                Some(format!("returned from {}", summary.function_id)),
            ));
            let t = TaintValue {
                origin: TaintOrigin::Source {
                    location: rs.origin_location.clone(),
                    entry_id: rs.entry_id.clone(),
                },
                path,
                sanitizers: rs.sanitizers.clone(),
                hops,
                depth_truncated: rs.depth_truncated || hops > self.ctx.max_call_depth,
            };
            result = Some(match result {
                Some(existing) => existing.merge(t),
                None => t,
            });
        }

        result
    }

    /// Union of inputs with a propagation step: the fallback when a
    /// call cannot be resolved (favors recall over precision).
    fn conservative_result(
        &mut self,
        recv_taint: Option<TaintValue>,
        arg_taints: Vec<Option<TaintValue>>,
        expr: &str,
        location: &Location,
    ) -> Option<TaintValue> {
        merge_all(recv_taint, arg_taints).map(|t| {
            t.stepped(FlowStep::new(
                FlowStepKind::Propagation,
                expr.to_string(),
                location,
                Some("through unresolved call".to_string()),
            ))
        })
    }

    fn record_sink_hit(
        &mut self,
        entry: &CatalogEntry,
        taint: &TaintValue,
        location: &Location,
        expr: &str,
    ) {
        let sink_step = FlowStep::new(
            FlowStepKind::Sink,
            expr.to_string(),
            location,
            Some(format!("flows into {}", entry.id)),
        );
        let mut path = taint.path.clone();
        path.push(sink_step);

        match &taint.origin {
            TaintOrigin::Source {
                location: source_location,
                ..
            } => {
                self.flows.push(CandidateFlow {
                    source_location: source_location.clone(),
                    sink_location: location.clone(),
                    sink_entry: entry.clone(),
                    function_id: self.function_id.clone(),
                    path,
                    sanitizers: taint.sanitizers.clone(),
                    hops: taint.hops,
                    depth_truncated: taint.depth_truncated,
                });
            }
            TaintOrigin::Parameter { index } => {
                self.push_sink_reach(
                    *index,
                    SinkReach {
                        sink_entry: entry.clone(),
                        sink_location: location.clone(),
                        function_id: self.function_id.clone(),
                        local_path: path,
                        sanitizers: taint.sanitizers.clone(),
                        hops: taint.hops,
                        depth_truncated: taint.depth_truncated,
                    },
                );
            }
        }
    }

    /// A tainted argument meets a sink recorded in the callee's
    /// (composed) signature: synthesize the bridged flow.
    fn record_bridged_sink(&mut self, arg: &TaintValue, reach: &SinkReach, bridge: &FlowStep) {
        let hops = arg.hops + reach.hops + 1;
        let depth_truncated =
            arg.depth_truncated || reach.depth_truncated || hops > self.ctx.max_call_depth;

        let mut path = arg.path.clone();
        path.push(bridge.clone());
        path.extend(reach.local_path.iter().cloned());

        let mut sanitizers = arg.sanitizers.clone();
        sanitizers.extend(reach.sanitizers.iter().cloned());

        match &arg.origin {
            TaintOrigin::Source {
                location: source_location,
                ..
            } => {
                self.flows.push(CandidateFlow {
                    source_location: source_location.clone(),
                    sink_location: reach.sink_location.clone(),
                    sink_entry: reach.sink_entry.clone(),
                    function_id: reach.function_id.clone(),
                    path,
                    sanitizers,
                    hops,
                    depth_truncated,
                });
            }
            TaintOrigin::Parameter { index } => {
                // Composition: the parameter reaches a sink transitively.
                // Branches past the depth bound stop composing here,
                // guaranteeing termination on recursive call graphs.
                if hops > self.ctx.max_call_depth {
                    return;
                }
                self.push_sink_reach(
                    *index,
                    SinkReach {
                        sink_entry: reach.sink_entry.clone(),
                        sink_location: reach.sink_location.clone(),
                        function_id: reach.function_id.clone(),
                        local_path: path,
                        sanitizers,
                        hops,
                        depth_truncated,
                    },
                );
            }
        }
    }

    /// Record a parameter-to-sink fact, keeping one entry per distinct
    /// sink (minimum hop count wins) so composition converges.
    fn push_sink_reach(&mut self, index: usize, reach: SinkReach) {
        let bucket = self.signature.params_to_sinks.entry(index).or_default();
        if let Some(existing) = bucket
            .iter_mut()
            .find(|r| r.sink_entry.id == reach.sink_entry.id && r.sink_location == reach.sink_location)
        {
            if reach.hops < existing.hops {
                *existing = reach;
            }
            return;
        }
        bucket.push(reach);
    }

    fn record_return(&mut self, taint: TaintValue, location: &Location) {
        let mut path = taint.path.clone();
        path.push(FlowStep::new(
            FlowStepKind::Propagation,
            "return",
            location,
            Some("returned".to_string()),
        ));

        match &taint.origin {
            TaintOrigin::Parameter { index } => {
                let flow = ReturnFlow {
                    path,
                    sanitizers: taint.sanitizers.clone(),
                    hops: taint.hops,
                    depth_truncated: taint.depth_truncated,
                };
                match self.signature.params_to_return.get_mut(index) {
                    Some(existing) => {
                        // Prefer the unsanitized flow so recall survives
                        if existing.sanitizers.len() > flow.sanitizers.len() {
                            *existing = flow;
                        }
                    }
                    None => {
                        self.signature.params_to_return.insert(*index, flow);
                    }
                }
            }
            TaintOrigin::Source {
                location: origin_location,
                entry_id,
            } => {
                let rs = ReturnSource {
                    origin_location: origin_location.clone(),
                    entry_id: entry_id.clone(),
                    path,
                    sanitizers: taint.sanitizers.clone(),
                    hops: taint.hops,
                    depth_truncated: taint.depth_truncated,
                };
                match &mut self.signature.returns_source {
                    Some(existing) => {
                        if existing.sanitizers.len() > rs.sanitizers.len() {
                            *existing = rs;
                        }
                    }
                    None => self.signature.returns_source = Some(rs),
                }
            }
        }
    }
}

/// Highest base confidence wins; ties break on the entry id so the
/// choice is deterministic.
fn best_entry<'e>(entries: &[&'e CatalogEntry]) -> Option<&'e CatalogEntry> {
    entries.iter().copied().max_by(|a, b| {
        a.base_confidence
            .total_cmp(&b.base_confidence)
            .then_with(|| b.id.cmp(&a.id))
    })
}

fn merge_all(
    first: Option<TaintValue>,
    rest: Vec<Option<TaintValue>>,
) -> Option<TaintValue> {
    let mut result = first;
    for taint in rest.into_iter().flatten() {
        result = Some(match result {
            Some(existing) => existing.merge(taint),
            None => taint,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Matcher;
    use crate::domain::value_objects::{Severity, VulnerabilityClass};
    use crate::infrastructure::catalog_data;

    fn node(kind: NodeKind, line: u32) -> NormalizedNode {
        NormalizedNode::new(kind, Location::new("t.py", line))
    }

    fn call(name: &str, receiver: Option<&str>, line: u32, args: Vec<NormalizedNode>) -> NormalizedNode {
        let mut c = node(NodeKind::Call, line);
        c.callee = Some(Callee {
            name: name.to_string(),
            receiver: receiver.map(|r| r.to_string()),
        });
        c.args = args;
        c
    }

    fn assign(name: &str, line: u32, rhs: NormalizedNode) -> NormalizedNode {
        let mut a = node(NodeKind::Assignment, line).with_name(name);
        a.children = vec![rhs];
        a
    }

    fn ident(name: &str, line: u32) -> NormalizedNode {
        node(NodeKind::Identifier, line).with_name(name)
    }

    fn walk(stmts: Vec<NormalizedNode>) -> FunctionOutcome {
        let mut function = node(NodeKind::Function, 1).with_name("<module>");
        function.children = stmts;
        let graph = CallGraph::empty();
        let summaries = SignatureMap::new();
        let untrusted = BTreeSet::new();
        let ctx = WalkContext {
            catalog: catalog_data::builtin(),
            language: Language::Python,
            file: "t.py",
            call_graph: &graph,
            summaries: &summaries,
            max_call_depth: 10,
            untrusted_param_fns: &untrusted,
        };
        analyze_function(&function, &ctx)
    }

    #[test]
    fn source_to_sink_through_assignment() {
        // user = input(); query = "..." + user; db.execute(query)
        let concat = node(NodeKind::Expr, 2)
            .with_children(vec![node(NodeKind::Literal, 2), ident("user", 2)]);
        let outcome = walk(vec![
            assign("user", 1, call("input", None, 1, vec![])),
            assign("query", 2, concat),
            call("execute", Some("db"), 3, vec![ident("query", 3)]),
        ]);

        assert_eq!(outcome.flows.len(), 1);
        let flow = &outcome.flows[0];
        assert_eq!(flow.sink_entry.vulnerability_class, VulnerabilityClass::SqlInjection);
        assert_eq!(flow.source_location.line, 1);
        assert_eq!(flow.sink_location.line, 3);
        assert!(flow.sanitizers.is_empty());
        assert_eq!(flow.hops, 0);
        assert!(flow.path.len() >= 3);
    }

    #[test]
    fn sanitizer_keeps_flow_but_marks_it() {
        // user = input(); safe = escape_sql(user); db.execute(safe)
        let outcome = walk(vec![
            assign("user", 1, call("input", None, 1, vec![])),
            assign("safe", 2, call("escape_sql", None, 2, vec![ident("user", 2)])),
            call("execute", Some("db"), 3, vec![ident("safe", 3)]),
        ]);

        assert_eq!(outcome.flows.len(), 1);
        assert_eq!(outcome.flows[0].sanitizers, vec!["python-escape-sql".to_string()]);
    }

    #[test]
    fn untainted_rhs_clears_prior_taint() {
        let outcome = walk(vec![
            assign("x", 1, call("input", None, 1, vec![])),
            assign("x", 2, node(NodeKind::Literal, 2)),
            call("eval", None, 3, vec![ident("x", 3)]),
        ]);
        assert!(outcome.flows.is_empty());
    }

    #[test]
    fn branch_taint_unions_at_join() {
        // if cond: x = input()
        // eval(x) after the join still fires (either-branch semantics)
        let mut then_block = node(NodeKind::Block, 2);
        then_block.children = vec![assign("x", 2, call("input", None, 2, vec![]))];
        let mut conditional = node(NodeKind::Conditional, 1);
        conditional.children = vec![node(NodeKind::Expr, 1), then_block];

        let outcome = walk(vec![
            conditional,
            call("eval", None, 4, vec![ident("x", 4)]),
        ]);
        assert_eq!(outcome.flows.len(), 1);
    }

    #[test]
    fn clearing_in_one_branch_keeps_join_tainted() {
        let mut then_block = node(NodeKind::Block, 3);
        then_block.children = vec![assign("x", 3, node(NodeKind::Literal, 3))];
        let mut conditional = node(NodeKind::Conditional, 2);
        conditional.children = vec![node(NodeKind::Expr, 2), then_block];

        let outcome = walk(vec![
            assign("x", 1, call("input", None, 1, vec![])),
            conditional,
            call("eval", None, 5, vec![ident("x", 5)]),
        ]);
        assert_eq!(outcome.flows.len(), 1);
    }

    #[test]
    fn parameter_to_sink_lands_in_signature() {
        let mut function = node(NodeKind::Function, 1).with_name("run");
        function.children = vec![
            node(NodeKind::Parameter, 1).with_name("cmd"),
            call("system", Some("os"), 2, vec![ident("cmd", 2)]),
        ];
        let graph = CallGraph::empty();
        let summaries = SignatureMap::new();
        let untrusted = BTreeSet::new();
        let ctx = WalkContext {
            catalog: catalog_data::builtin(),
            language: Language::Python,
            file: "t.py",
            call_graph: &graph,
            summaries: &summaries,
            max_call_depth: 10,
            untrusted_param_fns: &untrusted,
        };
        let outcome = analyze_function(&function, &ctx);

        assert!(outcome.flows.is_empty());
        let reaches = outcome.signature.params_to_sinks.get(&0).unwrap();
        assert_eq!(reaches.len(), 1);
        assert_eq!(reaches[0].sink_entry.id, "python-os-system");
        assert_eq!(reaches[0].hops, 0);
    }

    #[test]
    fn parameter_to_return_lands_in_signature() {
        let mut function = node(NodeKind::Function, 1).with_name("passthrough");
        let mut ret = node(NodeKind::Return, 2);
        ret.children = vec![ident("v", 2)];
        function.children = vec![node(NodeKind::Parameter, 1).with_name("v"), ret];

        let graph = CallGraph::empty();
        let summaries = SignatureMap::new();
        let untrusted = BTreeSet::new();
        let ctx = WalkContext {
            catalog: catalog_data::builtin(),
            language: Language::Python,
            file: "t.py",
            call_graph: &graph,
            summaries: &summaries,
            max_call_depth: 10,
            untrusted_param_fns: &untrusted,
        };
        let outcome = analyze_function(&function, &ctx);
        assert!(outcome.signature.params_to_return.contains_key(&0));
        assert!(outcome.signature.returns_source.is_none());
    }

    #[test]
    fn unresolved_call_propagates_conservatively() {
        let outcome = walk(vec![
            assign("user", 1, call("input", None, 1, vec![])),
            assign("built", 2, call("build_query", None, 2, vec![ident("user", 2)])),
            call("execute", Some("db"), 3, vec![ident("built", 3)]),
        ]);
        assert_eq!(outcome.flows.len(), 1);
    }

    #[test]
    fn overlay_receiver_discriminates_sinks() {
        let overlay_entry = CatalogEntry {
            id: "org-audit-execute".to_string(),
            language: Language::Python,
            kind: CatalogKind::Sink,
            matcher: Matcher::method("audit", "log"),
            vulnerability_class: VulnerabilityClass::CodeInjection,
            severity: Severity::Medium,
            base_confidence: 0.6,
            description: String::new(),
        };
        let catalog = catalog_data::builtin()
            .with_overlay(&crate::domain::catalog::CatalogOverlay {
                version: None,
                entries: vec![overlay_entry],
            })
            .unwrap();

        let mut function = node(NodeKind::Function, 1).with_name("<module>");
        function.children = vec![
            assign("user", 1, call("input", None, 1, vec![])),
            call("log", Some("audit"), 2, vec![ident("user", 2)]),
            call("log", Some("logger"), 3, vec![ident("user", 3)]),
        ];
        let graph = CallGraph::empty();
        let summaries = SignatureMap::new();
        let untrusted = BTreeSet::new();
        let ctx = WalkContext {
            catalog: &catalog,
            language: Language::Python,
            file: "t.py",
            call_graph: &graph,
            summaries: &summaries,
            max_call_depth: 10,
            untrusted_param_fns: &untrusted,
        };
        let outcome = analyze_function(&function, &ctx);
        assert_eq!(outcome.flows.len(), 1);
        assert_eq!(outcome.flows[0].sink_location.line, 2);
    }
}
