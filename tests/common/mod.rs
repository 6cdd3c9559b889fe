//! Shared test helpers
//!
//! The engine consumes externally parsed trees; tests stand in for the
//! parsing collaborator with the tree-sitter grammar crates.

use taintflow::{FileInput, Language};

/// Parse `source` as `language`, producing an engine input.
pub fn parse(language: Language, path: &str, source: &str) -> FileInput {
    let grammar: tree_sitter::Language = match language {
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    };
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar)
        .expect("grammar should load");
    let tree = parser.parse(source, None).expect("parse should produce a tree");
    FileInput {
        path: path.to_string(),
        language,
        tree,
        source: source.to_string(),
    }
}

/// A file whose tree was parsed under the wrong language tag, which
/// the adapter must reject as malformed.
pub fn mismatched(path: &str, source: &str) -> FileInput {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .expect("grammar should load");
    let tree = parser.parse(source, None).expect("parse should produce a tree");
    FileInput {
        path: path.to_string(),
        language: Language::Python,
        tree,
        source: source.to_string(),
    }
}
