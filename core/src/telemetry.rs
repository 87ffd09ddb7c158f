//! Event sink handed to the index, ingestion and search components at construction.
//!
//! The core never installs a global subscriber; the embedding application decides where
//! events go and when they are flushed.

use std::path::Path;
use std::time::Duration;

pub trait Telemetry: Send + Sync {
    fn document_indexed(&self, id: &str, tokens: usize);
    fn document_skipped(&self, path: &Path, error: &dyn std::error::Error);
    fn search_completed(&self, query: &str, hits: usize, took: Duration);
    /// Called once on shutdown.
    fn flush(&self) {}
}

/// Forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn document_indexed(&self, id: &str, tokens: usize) {
        tracing::debug!(id, tokens, "indexed document");
    }

    fn document_skipped(&self, path: &Path, error: &dyn std::error::Error) {
        tracing::error!(path = %path.display(), %error, "skipping document");
    }

    fn search_completed(&self, query: &str, hits: usize, took: Duration) {
        tracing::info!(query, hits, took_s = took.as_secs_f64(), "search complete");
    }

    fn flush(&self) {
        tracing::debug!("telemetry flushed");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn document_indexed(&self, _id: &str, _tokens: usize) {}
    fn document_skipped(&self, _path: &Path, _error: &dyn std::error::Error) {}
    fn search_completed(&self, _query: &str, _hits: usize, _took: Duration) {}
}
