//! Normalized AST vocabulary
//!
//! The small node vocabulary every language adapter lowers into. The
//! propagation engines are generic over these nodes and never see
//! concrete syntax.

use serde::{Deserialize, Serialize};

use super::finding::Location;

/// Node kinds of the shared vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// File root; children are the functions defined in the file plus
    /// the synthetic `<module>` function holding top-level statements
    Module,
    /// Function definition; leading `Parameter` children, then body
    Function,
    Parameter,
    /// Call site; callee and arguments are carried out-of-band, any
    /// receiver expression is the first child
    Call,
    /// Assignment to `name`; single child is the right-hand side
    Assignment,
    Identifier,
    Literal,
    /// Conditional; first child is the condition, remaining children
    /// are `Block`s, one per branch
    Conditional,
    /// Loop; body traversed once, no fixpoint
    Loop,
    /// Return; optional single child is the returned expression
    Return,
    /// Statement sequence (branch or loop body)
    Block,
    /// Generic interior expression (concatenation, interpolation,
    /// collection literals); taint is the union over children
    Expr,
}

/// Resolved callee of a call site: the called name plus the textual
/// receiver path (`db.cursor` in `db.cursor.execute(q)`), when any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callee {
    pub name: String,
    pub receiver: Option<String>,
}

impl Callee {
    /// Full dotted path of the call, receiver included.
    pub fn dotted(&self) -> String {
        match &self.receiver {
            Some(r) => format!("{}.{}", r, self.name),
            None => self.name.clone(),
        }
    }
}

/// A node of the normalized tree.
///
/// Owned by the adapter for the lifetime of one file's analysis and
/// read-only downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedNode {
    pub kind: NodeKind,
    pub location: Location,
    /// Function name, assignment target, parameter or identifier name
    pub name: Option<String>,
    /// Callee of a `Call` node
    pub callee: Option<Callee>,
    /// Arguments of a `Call` node
    pub args: Vec<NormalizedNode>,
    pub children: Vec<NormalizedNode>,
}

impl NormalizedNode {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self {
            kind,
            location,
            name: None,
            callee: None,
            args: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NormalizedNode>) -> Self {
        self.children = children;
        self
    }

    /// Iterate functions of a `Module` root.
    pub fn functions(&self) -> impl Iterator<Item = &NormalizedNode> {
        self.children
            .iter()
            .filter(|c| c.kind == NodeKind::Function)
    }
}
