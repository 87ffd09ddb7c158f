use crate::error::{IndexError, Result};
use crate::telemetry::{Telemetry, TracingTelemetry};
use crate::tokenizer::Normalizer;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub type DocId = u32;

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// File-system path the content was read from; the external identity.
    pub id: String,
    pub content: String,
    /// Number of tokens the content normalized to.
    pub tokens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub postings: usize,
    pub tokens: usize,
}

#[derive(Default)]
struct State {
    postings: HashMap<String, Vec<Posting>>, // postings in document insertion order
    docs: HashMap<DocId, Document>,
    doc_terms: HashMap<DocId, Vec<String>>,
    ids: HashMap<String, DocId>,
    order: Vec<DocId>,
    next_doc_id: DocId,
}

impl State {
    fn remove_postings(&mut self, doc_id: DocId) {
        let Some(terms) = self.doc_terms.remove(&doc_id) else { return };
        for term in terms {
            if let Some(list) = self.postings.get_mut(&term) {
                list.retain(|p| p.doc_id != doc_id);
                if list.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }
    }
}

/// In-memory inverted index over whole documents keyed by path.
///
/// All mutation goes through a single write lock, so the index can be shared as
/// `Arc<InvertedIndex>` and fed from several ingesting threads.
pub struct InvertedIndex {
    normalizer: Arc<Normalizer>,
    telemetry: Arc<dyn Telemetry>,
    state: RwLock<State>,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::with_parts(Arc::new(Normalizer::default()), Arc::new(TracingTelemetry))
    }

    pub fn with_parts(normalizer: Arc<Normalizer>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self { normalizer, telemetry, state: RwLock::new(State::default()) }
    }

    pub fn normalizer(&self) -> &Arc<Normalizer> {
        &self.normalizer
    }

    pub fn telemetry(&self) -> &Arc<dyn Telemetry> {
        &self.telemetry
    }

    /// Index `content` under `id`. Adding an id that is already present replaces its
    /// content and postings rather than appending a second copy.
    pub fn add_document(&self, id: impl Into<String>, content: impl Into<String>) -> DocId {
        let id = id.into();
        let content = content.into();
        let tokens = self.normalizer.normalize(&content);

        let mut order: Vec<&str> = Vec::new();
        let mut tf_counts: HashMap<&str, u32> = HashMap::new();
        for token in &tokens {
            let count = tf_counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                order.push(token.as_str());
            }
            *count += 1;
        }

        let doc_id = {
            let mut state = self.state.write();
            let existing = state.ids.get(&id).copied();
            let doc_id = match existing {
                Some(existing) => {
                    state.remove_postings(existing);
                    existing
                }
                None => {
                    let fresh = state.next_doc_id;
                    state.next_doc_id += 1;
                    state.ids.insert(id.clone(), fresh);
                    state.order.push(fresh);
                    fresh
                }
            };
            for term in &order {
                state
                    .postings
                    .entry((*term).to_string())
                    .or_default()
                    .push(Posting { doc_id, term_frequency: tf_counts[term] });
            }
            state.doc_terms.insert(doc_id, order.iter().map(|t| (*t).to_string()).collect());
            state.docs.insert(doc_id, Document { id: id.clone(), content, tokens: tokens.len() });
            doc_id
        };

        self.telemetry.document_indexed(&id, tokens.len());
        doc_id
    }

    /// Read a UTF-8 file and index it under its path.
    pub fn add_file(&self, path: &Path) -> Result<DocId> {
        let bytes = fs::read(path).map_err(|source| IndexError::Read { path: path.to_path_buf(), source })?;
        let content = String::from_utf8(bytes).map_err(|_| IndexError::Decode { path: path.to_path_buf() })?;
        Ok(self.add_document(path.to_string_lossy().into_owned(), content))
    }

    /// Document ids in the posting list for `token`; empty when the token is unknown.
    pub fn lookup(&self, token: &str) -> Vec<String> {
        let reader = self.read();
        reader
            .postings(token)
            .iter()
            .filter_map(|p| reader.document(p.doc_id).map(|d| d.id.clone()))
            .collect()
    }

    /// Like [`InvertedIndex::lookup`] but with the term frequency of each posting.
    pub fn postings(&self, token: &str) -> Vec<(String, u32)> {
        let reader = self.read();
        reader
            .postings(token)
            .iter()
            .filter_map(|p| reader.document(p.doc_id).map(|d| (d.id.clone(), p.term_frequency)))
            .collect()
    }

    pub fn get_content(&self, id: &str) -> Result<String> {
        let state = self.state.read();
        state
            .ids
            .get(id)
            .and_then(|doc_id| state.docs.get(doc_id))
            .map(|d| d.content.clone())
            .ok_or_else(|| IndexError::UnknownDocument(id.to_string()))
    }

    pub fn document(&self, id: &str) -> Option<Document> {
        let state = self.state.read();
        state.ids.get(id).and_then(|doc_id| state.docs.get(doc_id)).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().ids.contains_key(id)
    }

    /// Ids of all indexed documents in the order they were first added.
    pub fn document_ids(&self) -> Vec<String> {
        let state = self.state.read();
        state.order.iter().filter_map(|doc_id| state.docs.get(doc_id)).map(|d| d.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            documents: state.docs.len(),
            terms: state.postings.len(),
            postings: state.postings.values().map(Vec::len).sum(),
            tokens: state.docs.values().map(|d| d.tokens).sum(),
        }
    }

    /// Drop every document and posting.
    pub fn clear(&self) {
        *self.state.write() = State::default();
    }

    /// Hold the read lock for a consistent view across several lookups.
    pub fn read(&self) -> IndexReader<'_> {
        IndexReader { state: self.state.read() }
    }
}

pub struct IndexReader<'a> {
    state: RwLockReadGuard<'a, State>,
}

impl IndexReader<'_> {
    pub fn postings(&self, token: &str) -> &[Posting] {
        self.state.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.state.docs.get(&doc_id)
    }
}
