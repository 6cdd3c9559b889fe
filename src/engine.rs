//! Engine facade
//!
//! Composition root wiring the catalog, adapter registry, and the
//! analysis use case behind one constructor. The surrounding tool
//! server holds a `TaintFlowEngine` and feeds it parsed files.

use std::sync::Arc;

use crate::application::use_cases::{AnalyzeFilesUseCase, FileInput};
use crate::domain::call_graph::{CallGraph, EntryPoint};
use crate::domain::catalog::{Catalog, CatalogError, CatalogOverlay};
use crate::domain::policy::{EngineConfig, ScanOutcome, ScanPolicy};
use crate::infrastructure::adapters::AdapterRegistry;
use crate::infrastructure::catalog_data;

/// Polyglot taint-flow analysis engine.
pub struct TaintFlowEngine {
    catalog: Arc<Catalog>,
    use_case: AnalyzeFilesUseCase,
}

impl TaintFlowEngine {
    /// Engine with the built-in catalog and default configuration.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(EngineConfig::default(), ScanPolicy::default())
    }

    /// Engine with explicit configuration and policy. A policy overlay
    /// derives the working catalog at construction; a malformed
    /// catalog fails here, never mid-scan.
    pub fn with_config(config: EngineConfig, policy: ScanPolicy) -> Result<Self, CatalogError> {
        let catalog: Arc<Catalog> = if policy.overlay.is_empty() {
            Arc::new(catalog_data::builtin().clone())
        } else {
            catalog_data::builtin().with_overlay(&CatalogOverlay {
                version: None,
                entries: policy.overlay.clone(),
            })?
        };

        let registry = Arc::new(AdapterRegistry::with_defaults());
        let use_case =
            AnalyzeFilesUseCase::new(Arc::clone(&catalog), registry, config, policy);

        Ok(Self { catalog, use_case })
    }

    /// Analyze a batch of parsed files against the call graph and
    /// entry points supplied by external collaborators.
    pub async fn analyze(
        &self,
        files: Vec<FileInput>,
        call_graph: &CallGraph,
        entry_points: &[EntryPoint],
    ) -> ScanOutcome {
        self.use_case.execute(files, call_graph, entry_points).await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{CatalogEntry, CatalogKind, Matcher};
    use crate::domain::value_objects::{Language, Severity, VulnerabilityClass};

    #[test]
    fn default_engine_constructs() {
        let engine = TaintFlowEngine::new().unwrap();
        assert!(!engine.catalog().is_empty());
    }

    #[test]
    fn invalid_overlay_fails_construction() {
        let policy = ScanPolicy {
            overlay: vec![CatalogEntry {
                id: "broken".to_string(),
                language: Language::Python,
                kind: CatalogKind::Sink,
                matcher: Matcher::callee("x"),
                vulnerability_class: VulnerabilityClass::Xss,
                severity: Severity::Low,
                base_confidence: 7.0,
                description: String::new(),
            }],
            ..Default::default()
        };
        assert!(TaintFlowEngine::with_config(EngineConfig::default(), policy).is_err());
    }
}
