//! JavaScript / TypeScript adapter
//!
//! Lowers tree-sitter-javascript (and the structurally compatible
//! TypeScript grammar) into the normalized vocabulary. Registered once
//! per language tag.

use tree_sitter::{Node, Tree};

use crate::domain::finding::Location;
use crate::domain::normalized::{Callee, NodeKind, NormalizedNode};
use crate::domain::value_objects::Language;

use super::{
    named_children, node_location, node_text, AdapterError, AstAdapter, MODULE_FUNCTION,
};

pub struct JavaScriptAdapter {
    language: Language,
}

impl JavaScriptAdapter {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

impl AstAdapter for JavaScriptAdapter {
    fn language(&self) -> Language {
        self.language
    }

    fn normalize(
        &self,
        tree: &Tree,
        source: &str,
        file: &str,
    ) -> Result<NormalizedNode, AdapterError> {
        let root = tree.root_node();
        if root.kind() != "program" {
            return Err(AdapterError::MalformedTree {
                file: file.to_string(),
                reason: format!("expected program root, found '{}'", root.kind()),
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

        let mut module_fn = NormalizedNode::new(NodeKind::Function, node_location(root, file))
            .with_name(MODULE_FUNCTION);
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
    functions: Vec<NormalizedNode>,
}

impl<'s> Lowering<'s> {
    fn loc(&self, node: Node<'_>) -> Location {
        node_location(node, self.file)
    }

    fn text(&self, node: Node<'_>) -> String {
        node_text(node, self.source)
    }

    fn lower_statement(&mut self, node: Node<'_>, out: &mut Vec<NormalizedNode>) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_else(|| format!("<anon:{}>", node.start_position().row + 1));
                let function = self.lower_function(node, name);
                self.functions.push(function);
            }
            "class_declaration" => {
                let class_name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_default();
                if let Some(body) = node.child_by_field_name("body") {
                    for member in named_children(body) {
                        if member.kind() == "method_definition" {
                            let method_name = member
                                .child_by_field_name("name")
                                .map(|n| self.text(n))
                                .unwrap_or_default();
                            let function = self
                                .lower_function(member, format!("{}.{}", class_name, method_name));
                            self.functions.push(function);
                        }
                    }
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in named_children(node) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    let Some(value) = declarator.child_by_field_name("value") else {
                        continue;
                    };
                    match value.kind() {
                        // `const f = () => ...` defines a function
                        "arrow_function" | "function_expression" | "function" => {
                            let function = self.lower_function(value, self.text(name));
                            self.functions.push(function);
                        }
                        _ => {
                            let mut assign =
                                NormalizedNode::new(NodeKind::Assignment, self.loc(declarator))
                                    .with_name(self.text(name));
                            assign.children = vec![self.lower_expression(value)];
                            out.push(assign);
                        }
                    }
                }
            }
            "expression_statement" => {
                for child in named_children(node) {
                    self.lower_expression_statement(child, out);
                }
            }
            "if_statement" => out.push(self.lower_if(node)),
            "for_statement" => {
                let mut children = Vec::new();
                for field in ["initializer", "condition", "increment"] {
                    if let Some(part) = node.child_by_field_name(field) {
                        let mut stmts = Vec::new();
                        self.lower_statement(part, &mut stmts);
                        children.extend(stmts);
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    children.push(self.lower_block(body));
                }
                out.push(NormalizedNode::new(NodeKind::Loop, self.loc(node)).with_children(children));
            }
            "for_in_statement" => {
                let mut children = Vec::new();
                if let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    let mut binding = NormalizedNode::new(NodeKind::Assignment, self.loc(left))
                        .with_name(self.text(left));
                    binding.children = vec![self.lower_expression(right)];
                    children.push(binding);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    children.push(self.lower_block(body));
                }
                out.push(NormalizedNode::new(NodeKind::Loop, self.loc(node)).with_children(children));
            }
            "while_statement" | "do_statement" => {
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
            "statement_block" => {
                out.push(self.lower_block(node));
            }
            "try_statement" => {
                let mut block = NormalizedNode::new(NodeKind::Block, self.loc(node));
                for child in named_children(node) {
                    match child.kind() {
                        "statement_block" => {
                            for stmt in named_children(child) {
                                self.lower_statement(stmt, &mut block.children);
                            }
                        }
                        "catch_clause" | "finally_clause" => {
                            if let Some(body) = child.child_by_field_name("body") {
                                for stmt in named_children(body) {
                                    self.lower_statement(stmt, &mut block.children);
                                }
                            }
                        }
                        _ => {}
                    }
                }
                out.push(block);
            }
            "import_statement" | "export_statement" | "comment" | "empty_statement"
            | "break_statement" | "continue_statement" => {}
            _ => {
                out.push(self.lower_expression(node));
            }
        }
    }

    /// Expression statements: assignments are lowered specially,
    /// everything else is a plain expression.
    fn lower_expression_statement(&mut self, node: Node<'_>, out: &mut Vec<NormalizedNode>) {
        match node.kind() {
            "assignment_expression" => {
                let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) else {
                    return;
                };
                let rhs = self.lower_expression(right);

                if left.kind() == "member_expression" {
                    // A property write doubles as a call-shaped sink
                    // (`el.innerHTML = x` matches the innerHTML entry)
                    let property = left
                        .child_by_field_name("property")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let receiver = left.child_by_field_name("object").map(|n| self.text(n));
                    let mut write = NormalizedNode::new(NodeKind::Call, self.loc(node));
                    write.callee = Some(Callee {
                        name: property,
                        receiver,
                    });
                    write.args = vec![rhs.clone()];
                    out.push(write);
                }

                let mut assign = NormalizedNode::new(NodeKind::Assignment, self.loc(node))
                    .with_name(self.text(left));
                assign.children = vec![rhs];
                out.push(assign);
            }
            "augmented_assignment_expression" => {
                let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) else {
                    return;
                };
                let old = NormalizedNode::new(NodeKind::Identifier, self.loc(left))
                    .with_name(self.text(left));
                let union = NormalizedNode::new(NodeKind::Expr, self.loc(node))
                    .with_children(vec![old, self.lower_expression(right)]);
                let mut assign = NormalizedNode::new(NodeKind::Assignment, self.loc(node))
                    .with_name(self.text(left));
                assign.children = vec![union];
                out.push(assign);
            }
            _ => out.push(self.lower_expression(node)),
        }
    }

    fn lower_function(&mut self, node: Node<'_>, name: String) -> NormalizedNode {
        let mut function = NormalizedNode::new(NodeKind::Function, self.loc(node)).with_name(name);

        let params = node
            .child_by_field_name("parameters")
            .map(named_children)
            .unwrap_or_default();
        if params.is_empty() {
            // Single-parameter arrow functions: `x => ...`
            if let Some(param) = node.child_by_field_name("parameter") {
                function.children.push(
                    NormalizedNode::new(NodeKind::Parameter, self.loc(param))
                        .with_name(self.text(param)),
                );
            }
        }
        for param in params {
            let param_name = match param.kind() {
                "identifier" => self.text(param),
                "required_parameter" | "optional_parameter" => param
                    .child_by_field_name("pattern")
                    .map(|n| self.text(n))
                    .unwrap_or_default(),
                "assignment_pattern" => param
                    .child_by_field_name("left")
                    .map(|n| self.text(n))
                    .unwrap_or_default(),
                "rest_pattern" => named_children(param)
                    .into_iter()
                    .next()
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

        if let Some(body) = node.child_by_field_name("body") {
            if body.kind() == "statement_block" {
                let mut stmts = Vec::new();
                for child in named_children(body) {
                    self.lower_statement(child, &mut stmts);
                }
                function.children.extend(stmts);
            } else {
                // Arrow function with an expression body implies return
                let mut ret = NormalizedNode::new(NodeKind::Return, self.loc(body));
                ret.children = vec![self.lower_expression(body)];
                function.children.push(ret);
            }
        }

        function
    }

    fn lower_if(&mut self, node: Node<'_>) -> NormalizedNode {
        let mut children = Vec::new();
        if let Some(cond) = node.child_by_field_name("condition") {
            children.push(self.lower_expression(cond));
        }
        if let Some(consequence) = node.child_by_field_name("consequence") {
            children.push(self.lower_block(consequence));
        }
        if let Some(alternative) = node.child_by_field_name("alternative") {
            // else_clause wraps either a block or a chained if
            let inner = named_children(alternative);
            if inner.is_empty() {
                children.push(self.lower_block(alternative));
            } else {
                for alt in inner {
                    children.push(self.lower_block(alt));
                }
            }
        }
        NormalizedNode::new(NodeKind::Conditional, self.loc(node)).with_children(children)
    }

    fn lower_block(&mut self, node: Node<'_>) -> NormalizedNode {
        let mut block = NormalizedNode::new(NodeKind::Block, self.loc(node));
        if node.kind() == "statement_block" {
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
            "call_expression" => self.lower_call(node),
            "new_expression" => {
                let mut call = NormalizedNode::new(NodeKind::Call, self.loc(node));
                if let Some(constructor) = node.child_by_field_name("constructor") {
                    call.callee = Some(Callee {
                        name: self.text(constructor),
                        receiver: None,
                    });
                }
                if let Some(arguments) = node.child_by_field_name("arguments") {
                    for arg in named_children(arguments) {
                        call.args.push(self.lower_expression(arg));
                    }
                }
                call
            }
            "identifier" | "property_identifier" | "shorthand_property_identifier" => {
                NormalizedNode::new(NodeKind::Identifier, self.loc(node)).with_name(self.text(node))
            }
            "member_expression" => {
                NormalizedNode::new(NodeKind::Identifier, self.loc(node)).with_name(self.text(node))
            }
            "template_string" => {
                let substitutions: Vec<NormalizedNode> = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "template_substitution")
                    .flat_map(|c| named_children(c))
                    .map(|e| self.lower_expression(e))
                    .collect();
                if substitutions.is_empty() {
                    NormalizedNode::new(NodeKind::Literal, self.loc(node))
                } else {
                    NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(substitutions)
                }
            }
            "binary_expression" => {
                let mut children = Vec::new();
                if let Some(left) = node.child_by_field_name("left") {
                    children.push(self.lower_expression(left));
                }
                if let Some(right) = node.child_by_field_name("right") {
                    children.push(self.lower_expression(right));
                }
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            "ternary_expression" | "object" | "array" | "pair" | "sequence_expression" => {
                let children = named_children(node)
                    .into_iter()
                    .map(|c| self.lower_expression(c))
                    .collect();
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            "subscript_expression" => {
                let mut children = Vec::new();
                if let Some(object) = node.child_by_field_name("object") {
                    children.push(self.lower_expression(object));
                }
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(children)
            }
            "parenthesized_expression" | "await_expression" | "spread_element"
            | "non_null_expression" | "as_expression" | "satisfies_expression" => {
                named_children(node)
                    .into_iter()
                    .next()
                    .map(|c| self.lower_expression(c))
                    .unwrap_or_else(|| NormalizedNode::new(NodeKind::Expr, self.loc(node)))
            }
            "assignment_expression" | "augmented_assignment_expression" => {
                // Assignment in expression position still binds
                let mut stmts = Vec::new();
                self.lower_expression_statement(node, &mut stmts);
                NormalizedNode::new(NodeKind::Expr, self.loc(node)).with_children(stmts)
            }
            "string" | "number" | "true" | "false" | "null" | "undefined" | "regex"
            | "arrow_function" | "function_expression" | "function" => {
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
                "member_expression" => {
                    let name = function
                        .child_by_field_name("property")
                        .map(|n| self.text(n))
                        .unwrap_or_default();
                    let receiver = function.child_by_field_name("object").map(|n| self.text(n));
                    call.callee = Some(Callee { name, receiver });
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
                if arg.kind() == "comment" {
                    continue;
                }
                call.args.push(self.lower_expression(arg));
            }
        }

        call
    }
}
