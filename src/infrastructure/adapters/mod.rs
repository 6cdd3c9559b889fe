//! Language adapters
//!
//! One `AstAdapter` per supported concrete syntax, selected through a
//! registry keyed on the language tag. Adapters are the only place
//! language-specific syntax exists; everything downstream consumes the
//! normalized vocabulary.
//!
//! Parse trees come from an external collaborator; the adapters only
//! lower them.

pub mod javascript;
pub mod python;

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

use crate::domain::finding::Location;
use crate::domain::normalized::NormalizedNode;
use crate::domain::value_objects::Language;

pub use javascript::JavaScriptAdapter;
pub use python::PythonAdapter;

/// Name of the synthetic function holding a file's module-level
/// statements.
pub const MODULE_FUNCTION: &str = "<module>";

/// Build the canonical function id for a function in a file.
pub fn function_id(file: &str, name: &str) -> String {
    format!("{}::{}", file, name)
}

/// Per-file adapter failures. Both variants isolate to the offending
/// file and surface as diagnostics; the batch continues.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("no adapter registered for language: {0}")]
    UnsupportedLanguage(Language),
    #[error("malformed parse tree for {file}: {reason}")]
    MalformedTree { file: String, reason: String },
}

/// Strategy interface: lowers one language's concrete syntax into the
/// normalized vocabulary.
pub trait AstAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Lower an externally parsed tree to a normalized `Module` root.
    fn normalize(
        &self,
        tree: &Tree,
        source: &str,
        file: &str,
    ) -> Result<NormalizedNode, AdapterError>;
}

/// Registry of adapters keyed by language tag.
///
/// Adding a source language means implementing one adapter and
/// registering it here, plus catalog entries.
pub struct AdapterRegistry {
    adapters: HashMap<Language, Box<dyn AstAdapter>>,
}

impl AdapterRegistry {
    /// Registry with all built-in adapters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PythonAdapter));
        registry.register(Box::new(JavaScriptAdapter::new(Language::JavaScript)));
        registry.register(Box::new(JavaScriptAdapter::new(Language::TypeScript)));
        registry
    }

    /// Registry with no adapters; callers register their own set.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Box<dyn AstAdapter>) {
        self.adapters.insert(adapter.language(), adapter);
    }

    pub fn normalize(
        &self,
        tree: &Tree,
        source: &str,
        file: &str,
        language: Language,
    ) -> Result<NormalizedNode, AdapterError> {
        let adapter = self
            .adapters
            .get(&language)
            .ok_or(AdapterError::UnsupportedLanguage(language))?;
        adapter.normalize(tree, source, file)
    }

    pub fn supports(&self, language: Language) -> bool {
        self.adapters.contains_key(&language)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Location of a concrete node, 1-based lines.
pub(crate) fn node_location(node: Node<'_>, file: &str) -> Location {
    let start = node.start_position();
    let end = node.end_position();
    Location::new(file, start.row as u32 + 1)
        .with_columns(start.column as u32, end.column as u32)
        .with_end_line(end.row as u32 + 1)
}

/// Source text of a concrete node.
pub(crate) fn node_text(node: Node<'_>, source: &str) -> String {
    node.utf8_text(source.as_bytes())
        .unwrap_or_default()
        .to_string()
}

/// Named children of a concrete node, in order.
pub(crate) fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalized::NodeKind;

    fn parse_python(source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn empty_registry_reports_unsupported_language() {
        let registry = AdapterRegistry::empty();
        let tree = parse_python("x = 1\n");
        let result = registry.normalize(&tree, "x = 1\n", "a.py", Language::Python);
        assert!(matches!(result, Err(AdapterError::UnsupportedLanguage(_))));
    }

    #[test]
    fn default_registry_supports_all_builtin_languages() {
        let registry = AdapterRegistry::with_defaults();
        assert!(registry.supports(Language::Python));
        assert!(registry.supports(Language::JavaScript));
        assert!(registry.supports(Language::TypeScript));
    }

    #[test]
    fn python_module_normalizes_with_synthetic_module_function() {
        let source = "user = input()\neval(user)\n";
        let tree = parse_python(source);
        let registry = AdapterRegistry::with_defaults();
        let root = registry
            .normalize(&tree, source, "a.py", Language::Python)
            .unwrap();

        assert_eq!(root.kind, NodeKind::Module);
        let names: Vec<&str> = root
            .functions()
            .filter_map(|f| f.name.as_deref())
            .collect();
        assert_eq!(names, vec![MODULE_FUNCTION]);
    }

    #[test]
    fn wrong_language_tag_is_malformed() {
        let tree = parse_python("x = 1\n");
        let registry = AdapterRegistry::with_defaults();
        let result = registry.normalize(&tree, "x = 1\n", "a.js", Language::JavaScript);
        assert!(matches!(result, Err(AdapterError::MalformedTree { .. })));
    }

    #[test]
    fn hoisted_functions_appear_beside_the_module_function() {
        let source = "def handler(q):\n    eval(q)\n\nhandler(input())\n";
        let tree = parse_python(source);
        let registry = AdapterRegistry::with_defaults();
        let root = registry
            .normalize(&tree, source, "a.py", Language::Python)
            .unwrap();

        let names: Vec<&str> = root
            .functions()
            .filter_map(|f| f.name.as_deref())
            .collect();
        assert_eq!(names, vec!["handler", MODULE_FUNCTION]);
    }
}
