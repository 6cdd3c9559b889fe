//! TypeScript catalog entries
//!
//! TypeScript shares the JavaScript runtime surface, so its entries
//! mirror the JavaScript set under the TypeScript language tag.

use crate::domain::catalog::CatalogEntry;
use crate::domain::value_objects::Language;

pub fn entries() -> Vec<CatalogEntry> {
    super::javascript::language_entries(Language::TypeScript, "typescript")
}
