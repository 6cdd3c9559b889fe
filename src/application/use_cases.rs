//! Analysis use cases
//!
//! Orchestrates the pipeline: parallel per-file normalization, the
//! interprocedural synchronization point, scoring, reachability, and
//! aggregation. Per-file failures isolate into diagnostics; one bad
//! file never aborts the batch.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::domain::call_graph::{CallGraph, EntryPoint};
use crate::domain::catalog::Catalog;
use crate::domain::policy::{
    Diagnostic, DiagnosticKind, EngineConfig, ScanOutcome, ScanPolicy,
};
use crate::domain::value_objects::Language;
use crate::infrastructure::adapters::{AdapterError, AdapterRegistry};
use crate::infrastructure::aggregate::aggregate;
use crate::infrastructure::interproc::{propagate_across_calls, FileModule};
use crate::infrastructure::reachability::mark_reachability;
use crate::infrastructure::scoring::score;

/// One parsed file handed in by the external parsing collaborator.
pub struct FileInput {
    pub path: String,
    pub language: Language,
    pub tree: tree_sitter::Tree,
    pub source: String,
}

/// Use case analyzing a batch of parsed files.
pub struct AnalyzeFilesUseCase {
    catalog: Arc<Catalog>,
    registry: Arc<AdapterRegistry>,
    config: EngineConfig,
    policy: ScanPolicy,
}

impl AnalyzeFilesUseCase {
    pub fn new(
        catalog: Arc<Catalog>,
        registry: Arc<AdapterRegistry>,
        config: EngineConfig,
        policy: ScanPolicy,
    ) -> Self {
        Self {
            catalog,
            registry,
            config,
            policy,
        }
    }

    #[instrument(skip_all, fields(file_count = files.len(), edges = call_graph.edges.len()))]
    pub async fn execute(
        &self,
        files: Vec<FileInput>,
        call_graph: &CallGraph,
        entry_points: &[EntryPoint],
    ) -> ScanOutcome {
        info!("starting taint analysis");

        let (mut modules, mut diagnostics) = self.normalize_files(files).await;

        // Walk order is part of the determinism contract; task
        // completion order is not
        modules.sort_by(|a, b| a.file.cmp(&b.file));
        diagnostics.sort_by(|a, b| a.file.cmp(&b.file));
        let files_analyzed = modules.len();

        // Single synchronization point: every per-file signature must
        // exist before cross-call propagation
        let propagation = propagate_across_calls(
            &modules,
            &self.catalog,
            call_graph,
            entry_points,
            self.config.max_call_depth,
        );

        let mut findings = Vec::with_capacity(propagation.flows.len());
        let mut sink_functions = Vec::with_capacity(propagation.flows.len());
        for flow in &propagation.flows {
            findings.push(score(flow));
            sink_functions.push(flow.function_id.clone());
        }

        mark_reachability(&mut findings, &sink_functions, entry_points, call_graph);

        let findings = aggregate(findings, &self.policy);

        info!(
            files_analyzed,
            finding_count = findings.findings.len(),
            diagnostic_count = diagnostics.len(),
            truncated = findings.truncated,
            "taint analysis completed"
        );

        ScanOutcome {
            findings,
            diagnostics,
            files_analyzed,
        }
    }

    /// Fan out normalization across a bounded worker pool. Each file is
    /// independent; shared state is the immutable adapter registry.
    async fn normalize_files(
        &self,
        files: Vec<FileInput>,
    ) -> (Vec<FileModule>, Vec<Diagnostic>) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let mut join_set: JoinSet<Result<FileModule, Diagnostic>> = JoinSet::new();

        for file in files {
            let registry = Arc::clone(&self.registry);
            let permit = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = permit.acquire().await.ok();
                debug!(file = %file.path, language = %file.language, "normalizing file");
                registry
                    .normalize(&file.tree, &file.source, &file.path, file.language)
                    .map(|root| FileModule {
                        file: file.path.clone(),
                        language: file.language,
                        root,
                    })
                    .map_err(|e| adapter_diagnostic(e, &file.path, file.language))
            });
        }

        let mut modules = Vec::new();
        let mut diagnostics = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(module)) => modules.push(module),
                Ok(Err(diagnostic)) => {
                    warn!(file = %diagnostic.file, kind = ?diagnostic.kind, "file skipped");
                    diagnostics.push(diagnostic);
                }
                Err(join_error) => {
                    // A panicking adapter loses its file, not the scan
                    warn!(error = %join_error, "file analysis task failed");
                    diagnostics.push(Diagnostic {
                        file: "<unknown>".to_string(),
                        language: None,
                        kind: DiagnosticKind::MalformedTree,
                        message: format!("analysis task failed: {}", join_error),
                    });
                }
            }
        }

        (modules, diagnostics)
    }
}

fn adapter_diagnostic(error: AdapterError, file: &str, language: Language) -> Diagnostic {
    let kind = match &error {
        AdapterError::UnsupportedLanguage(_) => DiagnosticKind::UnsupportedLanguage,
        AdapterError::MalformedTree { .. } => DiagnosticKind::MalformedTree,
    };
    Diagnostic {
        file: file.to_string(),
        language: Some(language),
        kind,
        message: error.to_string(),
    }
}
