use crate::config::Config;
use crate::error::Result;
use crate::index::{InvertedIndex, IndexStats};
use crate::ingest::{ensure_dir, import_file, ingest_dir, IngestOptions, IngestReport};
use crate::search::{ScoredHit, SearchEngine};
use crate::snippet;
use crate::telemetry::Telemetry;
use crate::tokenizer::Normalizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A searchable document folder: the data directory, its index and a search engine
/// over it. This is what a front-end holds on to for the lifetime of the process.
pub struct Library {
    config: Config,
    data_dir: PathBuf,
    index: Arc<InvertedIndex>,
    engine: SearchEngine,
    ingest: IngestOptions,
    telemetry: Arc<dyn Telemetry>,
    last_report: IngestReport,
}

impl Library {
    /// Make sure the data directory exists, then index everything in it.
    pub fn open(config: Config, telemetry: Arc<dyn Telemetry>) -> Result<Self> {
        let data_dir = config.data_dir_path();
        ensure_dir(&data_dir)?;

        let mut normalizer = Normalizer::new(config.normalizer_options());
        normalizer.extend_stopwords(&config.extra_stopwords);
        let index = Arc::new(InvertedIndex::with_parts(Arc::new(normalizer), Arc::clone(&telemetry)));
        let engine = SearchEngine::new(Arc::clone(&index))
            .with_rank_mode(config.rank_mode)
            .with_limit(config.max_results);
        let ingest = IngestOptions::from(&config);
        let last_report = ingest_dir(&index, &data_dir, &ingest)?;

        Ok(Self { config, data_dir, index, engine, ingest, telemetry, last_report })
    }

    pub fn search(&self, query: &str) -> Vec<(String, String)> {
        self.engine.search(query)
    }

    pub fn search_scored(&self, query: &str) -> Vec<ScoredHit> {
        self.engine.search_scored(query)
    }

    /// Distinct query words as the index normalizes them, for previews and highlighting.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        snippet::query_terms_with(self.index.normalizer(), query)
    }

    /// Preview of `content` around the first word of `query` it contains.
    pub fn snippet(&self, content: &str, query: &str) -> Option<String> {
        snippet::snippet(content, &self.query_terms(query), self.config.snippet_width)
    }

    pub fn get_content(&self, id: &str) -> Result<String> {
        self.index.get_content(id)
    }

    /// Copy a file into the data directory and index it.
    pub fn import(&self, src: &Path) -> Result<String> {
        import_file(&self.index, src, &self.data_dir, &self.ingest)
    }

    /// Forget everything and rescan the data directory.
    pub fn reload(&mut self) -> Result<&IngestReport> {
        ensure_dir(&self.data_dir)?;
        self.index.clear();
        self.last_report = ingest_dir(&self.index, &self.data_dir, &self.ingest)?;
        Ok(&self.last_report)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn last_report(&self) -> &IngestReport {
        &self.last_report
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &Arc<InvertedIndex> {
        &self.index
    }

    /// Flush telemetry. Call once on shutdown.
    pub fn close(self) {
        tracing::debug!(documents = self.index.len(), "closing library");
        self.telemetry.flush();
    }
}
