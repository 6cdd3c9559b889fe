//! Built-in catalog entries
//!
//! The default sink/source/sanitizer catalog shipped with the engine,
//! one data module per supported language. Organization overlays layer
//! on top of these (see `domain::catalog`).

pub mod javascript;
pub mod python;
pub mod typescript;

use once_cell::sync::Lazy;

use crate::domain::catalog::{Catalog, CatalogEntry, CatalogKind, Matcher};
use crate::domain::value_objects::{Language, Severity, VulnerabilityClass};

/// Built-in catalog version; bumped whenever entries change.
pub const BUILTIN_CATALOG_VERSION: &str = "2025.08";

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let mut entries = Vec::new();
    entries.extend(python::entries());
    entries.extend(javascript::entries());
    entries.extend(typescript::entries());
    // A panic here means the shipped entry data itself is corrupt,
    // which must fail deployment, not individual scans.
    match Catalog::new(BUILTIN_CATALOG_VERSION, entries) {
        Ok(catalog) => catalog,
        Err(e) => panic!("built-in catalog is invalid: {e}"),
    }
});

/// The shared built-in catalog.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

/// Entry constructor shared by the per-language data modules.
#[allow(clippy::too_many_arguments)]
pub(crate) fn entry(
    id: &str,
    language: Language,
    kind: CatalogKind,
    matcher: Matcher,
    class: VulnerabilityClass,
    severity: Severity,
    base_confidence: f32,
    description: &str,
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        language,
        kind,
        matcher,
        vulnerability_class: class,
        severity,
        base_confidence,
        description: description.to_string(),
    }
}
