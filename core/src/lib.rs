//! In-memory keyword search over a folder of text documents.

pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod library;
pub mod search;
pub mod snippet;
pub mod telemetry;
pub mod tokenizer;

pub use config::Config;
pub use error::{IndexError, Result};
pub use index::{DocId, Document, IndexStats, InvertedIndex, Posting};
pub use ingest::{IngestOptions, IngestReport};
pub use library::Library;
pub use search::{RankMode, ScoredHit, SearchEngine};
pub use telemetry::{NoopTelemetry, Telemetry, TracingTelemetry};
pub use tokenizer::{normalize, Normalizer, NormalizerOptions};
