use crate::index::{DocId, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// How candidates are ordered once they matched at least one query term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Count of document characters that occur anywhere in the lower-cased query.
    #[default]
    CharacterOverlap,
    /// Sum of the document's term frequencies for every matched query term.
    TermFrequency,
    /// Number of distinct query terms the document matched.
    MatchCount,
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankMode::CharacterOverlap => "character_overlap",
            RankMode::TermFrequency => "term_frequency",
            RankMode::MatchCount => "match_count",
        };
        f.write_str(name)
    }
}

impl FromStr for RankMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "character_overlap" | "overlap" => Ok(RankMode::CharacterOverlap),
            "term_frequency" | "tf" => Ok(RankMode::TermFrequency),
            "match_count" | "matches" => Ok(RankMode::MatchCount),
            other => Err(format!("unknown rank mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredHit {
    pub id: String,
    pub content: String,
    /// Distinct query terms found in the document.
    pub matched_terms: usize,
    pub score: u64,
}

struct Candidate {
    doc_id: DocId,
    matched: usize,
    term_frequency: u64,
}

/// Runs keyword queries against a shared [`InvertedIndex`].
pub struct SearchEngine {
    index: Arc<InvertedIndex>,
    rank_mode: RankMode,
    limit: Option<usize>,
}

impl SearchEngine {
    pub fn new(index: Arc<InvertedIndex>) -> Self {
        Self { index, rank_mode: RankMode::default(), limit: None }
    }

    pub fn with_rank_mode(mut self, rank_mode: RankMode) -> Self {
        self.rank_mode = rank_mode;
        self
    }

    /// Cap the number of returned hits. `None` returns every candidate.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn rank_mode(&self) -> RankMode {
        self.rank_mode
    }

    pub fn index(&self) -> &Arc<InvertedIndex> {
        &self.index
    }

    /// `(id, content)` pairs ordered by descending rank, ties in first-seen order.
    pub fn search(&self, query: &str) -> Vec<(String, String)> {
        self.search_scored(query).into_iter().map(|hit| (hit.id, hit.content)).collect()
    }

    pub fn search_scored(&self, query: &str) -> Vec<ScoredHit> {
        let start = Instant::now();
        let tokens = self.index.normalizer().normalize_cached(query);

        let mut seen = HashSet::new();
        let terms: Vec<&str> = tokens.iter().map(String::as_str).filter(|t| seen.insert(*t)).collect();
        if terms.is_empty() {
            self.index.telemetry().search_completed(query, 0, start.elapsed());
            return Vec::new();
        }

        let reader = self.index.read();
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut slots: HashMap<DocId, usize> = HashMap::new();
        for term in &terms {
            for posting in reader.postings(term) {
                let slot = *slots.entry(posting.doc_id).or_insert_with(|| {
                    candidates.push(Candidate { doc_id: posting.doc_id, matched: 0, term_frequency: 0 });
                    candidates.len() - 1
                });
                let candidate = &mut candidates[slot];
                candidate.matched += 1;
                candidate.term_frequency += u64::from(posting.term_frequency);
            }
        }

        let lowered_query = query.to_lowercase();
        let mut hits: Vec<ScoredHit> = candidates
            .into_iter()
            .filter_map(|c| {
                let doc = reader.document(c.doc_id)?;
                let score = match self.rank_mode {
                    RankMode::CharacterOverlap => character_overlap(&doc.content, &lowered_query),
                    RankMode::TermFrequency => c.term_frequency,
                    RankMode::MatchCount => c.matched as u64,
                };
                Some(ScoredHit { id: doc.id.clone(), content: doc.content.clone(), matched_terms: c.matched, score })
            })
            .collect();
        drop(reader);

        // sort_by is stable: equal scores keep first-seen order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }

        self.index.telemetry().search_completed(query, hits.len(), start.elapsed());
        hits
    }
}

/// Number of characters of `content` that appear anywhere in `query`.
pub fn character_overlap(content: &str, query: &str) -> u64 {
    let query_chars: HashSet<char> = query.chars().collect();
    content.chars().filter(|c| query_chars.contains(c)).count() as u64
}
