//! Python adapter
//!
//! Lowers tree-sitter-python concrete syntax into the normalized
//! vocabulary. Nested and method definitions are hoisted to the module
//! root; module-level statements collect into the synthetic `<module>`
//! function.

use tree_sitter::{Node, Tree};

use crate::domain::finding::Location;
use crate::domain::normalized::{Callee, NodeKind, NormalizedNode};
use crate::domain::value_objects::Language;

use super::{
    named_children, node_location, node_text, AdapterError, AstAdapter, MODULE_FUNCTION,
};

pub struct PythonAdapter;

impl AstAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn normalize(
        &self,
        tree: &Tree,
        source: &str,
        file: &str,
    ) -> Result<NormalizedNode, AdapterError> {
        let root = tree.root_node();
        if root.kind() != "module" {
            return Err(AdapterError::MalformedTree {
                file: file.to_string(),
                reason: format!("expected python module root, found '{}'", root.kind()),
            });
        }

        let mut lower = Lowering {
            source,
            file,
            functions: Vec::new(),
        };

        let mut module_stmts = Vec::new();
        for child in named_children(root) {
            lower.lower_statement(child, &mut module_stmts);
        }

        let mut module_fn =
            NormalizedNode::new(NodeKind::Function, node_location(root, file)).with_name(MODULE_FUNCTION);
        module_fn.children = module_stmts;

        let mut functions = std::mem::take(&mut lower.functions);
        functions.push(module_fn);

        Ok(NormalizedNode::new(NodeKind::Module, node_location(root, file))
            .with_children(functions))
    }
}

struct Lowering<'s> {
    source: &'s str,
    file: &'s str,
    /// Hoisted function definitions, module root children
    functions: Vec<NormalizedNode>,
}

impl<'s> Lowering<'s> {
    fn loc(&self, node: Node<'_>) -> Location {
        node_location(node, self.file)
    }

    fn text(&self, node: Node<'_>) -> String {
        node_text(node, self.source)
    }

    /// Lower a statement node, appending normalized statements to
    /// `out`. Function and class definitions hoist instead.
    fn lower_statement(&mut self, node: Node<'_>, out: &mut Vec<NormalizedNode>) {
        match node.kind() {
            "function_definition" => {
                let function = self.lower_function(node, None);
                self.functions.push(function);
            }
            "decorated_definition" => {
                if let Some(def) = node.child_by_field_name("definition") {
                    self.lower_statement(def, out);
                }
            }
            "class_definition" => {
                let class_name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_default();
                if let Some(body) = node.child_by_field_name("body") {
                    for child in named_children(body) {
                        match child.kind() {
                            "function_definition" => {
                                let function = self.lower_function(child, Some(&class_name));
                                self.functions.push(function);
                            }
                            "decorated_definition" => {
                                if let Some(def) = child.child_by_field_name("definition") {
                                    if def.kind() == "function_definition" {
                                        let function = self.lower_function(def, Some(&class_name));
                                        self.functions.push(function);
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            "expression_statement" => {
                for child in named_children(node) {
                    match child.kind() {
                        "assignment" => self.lower_assignment(child, out),
                        "augmented_assignment" => self.lower_augmented_assignment(child, out),
                        _ => out.push(self.lower_expression(child)),
                    }
                }
            }
            "if_statement" => out.push(self.lower_if(node)),
            "for_statement" => {
                let mut children = Vec::new();
                if let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    let mut binding =
                        NormalizedNode::new(NodeKind::Assignment, self.loc(left)).with_name(self.text(left));
                    binding.children = vec![self.lower_expression(right)];
                    children.push(binding);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    children.push(self.lower_block(body));
                }
                out.push(NormalizedNode::new(NodeKind::Loop, self.loc(node)).with_children(children));
            }
            "while_statement" => {
                let mut children = Vec::new();
                if let Some(cond) = node.child_by_field_name("condition") {
                    children.push(self.lower_expression(cond));
                }
                if let Some(body) = node.child_by_field_name("body") {
                    children.push(self.lower_block(body));
                }
                out.push(NormalizedNode::new(NodeKind::Loop, self.loc(node)).with_children(children));
            }
            "return_statement" => {
                let mut ret = NormalizedNode::new(NodeKind::Return, self.loc(node));
                if let Some(value) = named_children(node).into_iter().next() {
                    ret.children = vec![self.lower_expression(value)];
                }
                out.push(ret);
            }
            "try_statement" => {
                let mut block = NormalizedNode::new(NodeKind::Block, self.loc(node));
                for child in named_children(node) {
                    match child.kind() {
                        "block" => {
                            for stmt in named_children(child) {
                                self.lower_statement(stmt, &mut block.children);
                            }
                        }
                        "except_clause" | "finally_clause" | "else_clause" => {
                            for inner in named_children(child) {
                                if inner.kind() == "block" {
                                    for stmt in named_children(inner) {
                                        self.lower_statement(stmt, &mut block.children);
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                out.push(block);
            }
            "with_statement" => {
                // `with open(p) as f:` binds f to the managed value
                for clause in named_children(node) {
                    if clause.kind() != "with_clause" {
                        continue;
                    }
                    for item in named_children(clause) {
                        let Some(value) = item.child_by_field_name("value") else {
                            continue;
                        };
                        if value.kind() == "as_pattern" {
                            let expr = value.named_child(0);
                            let alias = value.child_by_field_name("alias");
                            if let (Some(expr), Some(alias)) = (expr, alias) {
                                let mut binding = NormalizedNode::new(
                                    NodeKind::Assignment,
                                    self.loc(value),
                                )
                                .with_name(self.text(alias));
                                binding.children = vec![self.lower_expression(expr)];
                                out.push(binding);
                            }
                        } else {
                            out.push(self.lower_expression(value));
                        }
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    out.push(self.lower_block(body));
                }
            }
            // pass, import, global, comment and friends carry no taint
            "pass_statement" | "import_statement" | "import_from_statement" | "comment"
            | "global_statement" | "nonlocal_statement" | "break_statement"
            | "continue_statement" => {}
            _ => {
                // Unknown statement: lower it as a generic expression so
                // any nested calls are still observed
                out.push(self.lower_expression(node));
            }
        }
    }

    fn lower_function(&mut self, node: Node<'_>, class_name: Option<&str>) -> NormalizedNode {
        let bare_name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_else(|| format!("<anon:{}>", node.start_position().row + 1));
        let name = match class_name {
            Some(class) => format!("{}.{}", class, bare_name),
            None => bare_name,
        };

        let mut function =
            NormalizedNode::new(NodeKind::Function, self.loc(node)).with_name(name);

        if let Some(params) = node.child_by_field_name("parameters") {
            for param in named_children(params) {
                let param_name = match param.kind() {
                    "identifier" => self.text(param),
                    "default_parameter" | "typed_default_parameter" => param
                        .child_by_field_name("name")
                        .map(|n| self.text(n))
                        .unwrap_or_default(),
                    "typed_parameter" => param
                        .named_child(0)
                        .map(|n| self.text(n))
                        .unwrap_or_default(),
                    _ => self.text(param),
                };
                if param_name.is_empty() {
                    continue;
                }
                function.children.push(
                    NormalizedNode::new(NodeKind::Parameter, self.loc(param)).with_name(param_name),
                );
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut stmts = Vec::new();
            for child in named_children(body) {
                self.lower_statement(child, &mut stmts);
            }
            function.children.extend(stmts);
        }

        function
    }

    fn lower_assignment(&mut self, node: Node<'_>, out: &mut Vec<NormalizedNode>) {
        let Some(right) = node.child_by_field_name("right") else {
            return; // bare annotation, no value
        };
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let rhs = self.lower_expression(right);

        match left.kind() {
            "pattern_list" | "tuple_pattern" => {
                // a, b = expr — every target conservatively receives the
                // whole right-hand side's taint
                for target in named_children(left) {
                    let mut assign = NormalizedNode::new(NodeKind::Assignment, self.loc(target))
                        .with_name(self.text(target));
                    assign.children = vec![rhs.clone()];
                    out.push(assign);
                }
            }
            _ => {
                let mut assign = NormalizedNode::new(NodeKind::Assignment, self.loc(node))
                    .with_name(self.text(left));
                assign.children = vec![rhs];
                out.push(assign);
            }
        }
    }

    fn lower_augmented_assignment(&mut self, node: Node<'_>, out: &mut Vec<NormalizedNode>) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        // `x += y` unions the old value's taint with the increment's
        let old = NormalizedNode::new(NodeKind::Identifier, self.loc(left)).with_name(self.text(left));
        let union = NormalizedNode::new(NodeKind::Expr, self.loc(node))
            .with_children(vec![old, self.lower_expression(right)]);
        let mut assign =
            NormalizedNode::new(NodeKind::Assignment, self.loc(node)).with_name(self.text(left));
        assign.children = vec![union];
        out.push(assign);
    }

    fn lower_if(&mut self, node: Node<'_>) -> NormalizedNode {
        let mut children = Vec::new();
        if let Some(cond) = node.child_by_field_name("condition") {
            children.push(self.lower_expression(cond));
        }
        if let Some(consequence) = node.child_by_field_name("consequence") {
            children.push(self.lower_block(consequence));
        }
        for alt in named_children(node) {
            match alt.kind() {
                "elif_clause" => {
                    let nested = self.lower_if(alt);
                    let mut block = NormalizedNode::new(NodeKind::Block, self.loc(alt));
                    block.children = vec![nested];
                    children.push(block);
                }
                "else_clause" => {
                    if let Some(body) = alt.child_by_field_name("body") {
                        children.push(self.lower_block(body));
                    } else if let Some(body) = named_children(alt).into_iter().next() {
                        children.push(self.lower_block(body));
                    }
                }
                _ => {}
            }
        }
        NormalizedNode::new(NodeKind::Conditional, self.loc(node)).with_children(children)
    }

    fn lower_block(&mut self, node: Node<'_>) -> NormalizedNode {
        let mut block = NormalizedNode::new(NodeKind::Block, self.loc(node));
        if node.kind() == "block" {
            for child in named_children(node) {
                self.lower_statement(child, &mut block.children);
            }
        } else {
            self.lower_statement(node, &mut block.children);
        }
        block
    }

    fn lower_expression(&mut self, node: Node<'_>) -> NormalizedNode {
        match node.kind() {
            "call" => self.lower_call(node),
            "identifier" => {
                NormalizedNode::new(NodeKind::Identifier, self.loc(node)).with_name(self.text(node))
            }
            "attribute" => {
                // Bare attribute access tracks under its dotted path
                NormalizedNode::new(NodeKind::Identifier, self.loc(node)).with_name(self.text(node))
            }
            "string" => {
                let interpolations: Vec<NormalizedNode> = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "interpolation")
                    .flat_map(|c| named_children(c))
                    .map(|e| self.lower_expression(e))
                    .collect();
                if interpolations.is_empty() {
                    NormalizedNode::new(NodeKind::Literal, self.loc(node))
                } else {
                    NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(interpolations)
                }
            }
            "concatenated_string" => {
                let parts = named_children(node)
                    .into_iter()
                    .map(|c| self.lower_expression(c))
                    .collect();
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(parts)
            }
            "binary_operator" | "boolean_operator" => {
                let mut children = Vec::new();
                if let Some(left) = node.child_by_field_name("left") {
                    children.push(self.lower_expression(left));
                }
                if let Some(right) = node.child_by_field_name("right") {
                    children.push(self.lower_expression(right));
                }
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            // Comparisons yield clean booleans; taint does not propagate
            "comparison_operator" | "not_operator" => {
                NormalizedNode::new(NodeKind::Expr, self.loc(node))
            }
            "conditional_expression" | "list" | "tuple" | "set" | "dictionary" | "pair"
            | "list_comprehension" | "set_comprehension" | "dictionary_comprehension"
            | "generator_expression" => {
                let children = named_children(node)
                    .into_iter()
                    .map(|c| self.lower_expression(c))
                    .collect();
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            "subscript" => {
                let mut children = Vec::new();
                if let Some(value) = node.child_by_field_name("value") {
                    children.push(self.lower_expression(value));
                }
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            "parenthesized_expression" | "await" => named_children(node)
                .into_iter()
                .next()
                .map(|c| self.lower_expression(c))
                .unwrap_or_else(|| NormalizedNode::new(NodeKind::Expr, self.loc(node))),
            "integer" | "float" | "true" | "false" | "none" | "ellipsis" | "lambda" => {
                NormalizedNode::new(NodeKind::Literal, self.loc(node))
            }
            _ => {
                let children = named_children(node)
                    .into_iter()
                    .map(|c| self.lower_expression(c))
                    .collect();
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
        }
    }

    fn lower_call(&mut self, node: Node<'_>) -> NormalizedNode {
        let mut call = NormalizedNode::new(NodeKind::Call, self.loc(node));

        if let Some(function) = node.child_by_field_name("function") {
            match function.kind() {
                "identifier" => {
                    call.callee = Some(Callee {
                        name: self.text(function),
                        receiver: None,
                    });
                }
                "attribute" => {
                    let name = function
                        .child_by_field_name("attribute")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let receiver = function
                        .child_by_field_name("object")
                        .map(|n| self.text(n));
                    call.callee = Some(Callee { name, receiver });
                    // Receiver expression participates in taint union
                    if let Some(object) = function.child_by_field_name("object") {
                        call.children.push(self.lower_expression(object));
                    }
                }
                _ => {
                    call.children.push(self.lower_expression(function));
                }
            }
        }

        if let Some(arguments) = node.child_by_field_name("arguments") {
            for arg in named_children(arguments) {
                let lowered = match arg.kind() {
                    "keyword_argument" => arg
                        .child_by_field_name("value")
                        .map(|v| self.lower_expression(v)),
                    "list_splat" | "dictionary_splat" => named_children(arg)
                        .into_iter()
                        .next()
                        .map(|v| self.lower_expression(v)),
                    "comment" => None,
                    _ => Some(self.lower_expression(arg)),
                };
                if let Some(lowered) = lowered {
                    call.args.push(lowered);
                }
            }
        }

        call
    }
}
