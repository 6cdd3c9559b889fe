//! Sink/source/sanitizer catalog
//!
//! The catalog is the static registry of taint-relevant calls per
//! language. It is constructed once, validated, and shared read-only
//! across worker tasks; organization overlays derive a new catalog
//! rather than mutating the built-in one.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::value_objects::{Language, Severity, VulnerabilityClass};

/// Role of a catalog entry in taint propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Source,
    Sink,
    Sanitizer,
}

/// Call-site matcher: exact callee name plus an optional receiver
/// discriminator.
///
/// An entry without a receiver matches any call with that callee name;
/// a receiver-qualified entry matches only when the call site's
/// receiver path is identical (distinguishing e.g. a generic `execute`
/// method on a safe vs. unsafe receiver).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matcher {
    pub callee: String,
    #[serde(default)]
    pub receiver: Option<String>,
}

impl Matcher {
    pub fn callee(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            receiver: None,
        }
    }

    pub fn method(receiver: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            receiver: Some(receiver.into()),
        }
    }

    pub fn matches(&self, callee: &str, receiver: Option<&str>) -> bool {
        if self.callee != callee {
            return false;
        }
        match &self.receiver {
            None => true,
            Some(want) => receiver == Some(want.as_str()),
        }
    }
}

/// One catalog entry: a source, sink, or sanitizer pattern for a language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable entry identifier (e.g. "python-db-execute")
    pub id: String,
    pub language: Language,
    pub kind: CatalogKind,
    pub matcher: Matcher,
    pub vulnerability_class: VulnerabilityClass,
    pub severity: Severity,
    /// Base confidence in `[0, 1]` a match contributes before path
    /// adjustments
    pub base_confidence: f32,
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    /// Key identifying the match surface; overlay precedence and
    /// conflict detection both operate on it.
    fn key(&self) -> (Language, CatalogKind, &Matcher) {
        (self.language, self.kind, &self.matcher)
    }

    /// Two entries conflict when they share a key but disagree on the
    /// metadata a finding would copy from them.
    fn contradicts(&self, other: &CatalogEntry) -> bool {
        self.key() == other.key()
            && (self.vulnerability_class != other.vulnerability_class
                || self.severity != other.severity
                || (self.base_confidence - other.base_confidence).abs() > f32::EPSILON)
    }
}

/// Errors raised while constructing a catalog.
///
/// All of these are fatal: a malformed catalog means a corrupt
/// deployment, not a per-scan condition.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("conflicting catalog entries '{first}' and '{second}' share matcher '{callee}'")]
    ConflictingEntries {
        first: String,
        second: String,
        callee: String,
    },
    #[error("entry '{id}' has base confidence {value} outside [0, 1]")]
    InvalidConfidence { id: String, value: f32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("unsupported overlay file format: {0}")]
    UnsupportedFormat(String),
}

/// Serialized form of an organization overlay file (TOML or JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogOverlay {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl CatalogOverlay {
    /// Load overlay entries from a file, format chosen by extension
    /// (`.toml` or `.json`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(CatalogError::UnsupportedFormat(format!(
                "unsupported extension: .{}",
                ext
            ))),
            None => Err(CatalogError::UnsupportedFormat(
                "no file extension provided".to_string(),
            )),
        }
    }
}

/// Immutable, versioned registry of catalog entries.
///
/// Lookups return every matching entry; a call site matching several
/// entries produces several candidate flows, and classification ties
/// are resolved downstream by base confidence.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    /// Entries indexed by (language, kind, callee) for O(1) call-site
    /// lookup; receiver discrimination happens on the short bucket.
    index: HashMap<(Language, CatalogKind, String), Vec<CatalogEntry>>,
    entry_count: usize,
}

impl Catalog {
    /// Build a validated catalog from entries.
    ///
    /// Fails on out-of-range confidences and on duplicate entries whose
    /// metadata contradicts each other.
    pub fn new(
        version: impl Into<String>,
        entries: Vec<CatalogEntry>,
    ) -> Result<Self, CatalogError> {
        let mut index: HashMap<(Language, CatalogKind, String), Vec<CatalogEntry>> = HashMap::new();
        let mut entry_count = 0usize;

        for entry in entries {
            if !(0.0..=1.0).contains(&entry.base_confidence) {
                return Err(CatalogError::InvalidConfidence {
                    id: entry.id,
                    value: entry.base_confidence,
                });
            }

            let bucket = index
                .entry((entry.language, entry.kind, entry.matcher.callee.clone()))
                .or_default();

            if let Some(existing) = bucket.iter().find(|e| e.contradicts(&entry)) {
                return Err(CatalogError::ConflictingEntries {
                    first: existing.id.clone(),
                    second: entry.id,
                    callee: entry.matcher.callee,
                });
            }
            if bucket.iter().any(|e| e.key() == entry.key()) {
                // Exact duplicate, keep the first occurrence
                continue;
            }

            bucket.push(entry);
            entry_count += 1;
        }

        Ok(Self {
            version: version.into(),
            index,
            entry_count,
        })
    }

    /// Derive a new catalog with organization overlay entries layered on
    /// top. Overlay entries with an identical `(language, kind,
    /// matcher)` key replace the base entry (logged as a warning,
    /// never fatal); all others extend the catalog.
    pub fn with_overlay(&self, overlay: &CatalogOverlay) -> Result<Arc<Catalog>, CatalogError> {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(self.entry_count);

        for base in self.index.values().flatten() {
            let shadowed = overlay.entries.iter().find(|o| o.key() == base.key());
            match shadowed {
                Some(over) => {
                    warn!(
                        base = %base.id,
                        overlay = %over.id,
                        callee = %base.matcher.callee,
                        "overlay entry shadows built-in catalog entry"
                    );
                }
                None => entries.push(base.clone()),
            }
        }
        entries.extend(overlay.entries.iter().cloned());

        let version = match &overlay.version {
            Some(v) => format!("{}+{}", self.version, v),
            None => format!("{}+overlay", self.version),
        };
        Ok(Arc::new(Catalog::new(version, entries)?))
    }

    /// Return all entries matching a call site. Absence of a match is a
    /// valid, silent result.
    pub fn lookup(
        &self,
        language: Language,
        kind: CatalogKind,
        callee: &str,
        receiver: Option<&str>,
    ) -> Vec<&CatalogEntry> {
        self.index
            .get(&(language, kind, callee.to_string()))
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|e| e.matcher.matches(callee, receiver))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}
