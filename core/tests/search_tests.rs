use deskfind_core::{InvertedIndex, RankMode, SearchEngine};
use std::sync::Arc;

fn two_docs() -> Arc<InvertedIndex> {
    let index = Arc::new(InvertedIndex::new());
    index.add_document("a.txt", "The quick brown fox");
    index.add_document("b.txt", "The slow brown turtle");
    index
}

fn ids(results: &[(String, String)]) -> Vec<&str> {
    results.iter().map(|(id, _)| id.as_str()).collect()
}

#[test]
fn shared_term_returns_both_documents() {
    // character overlap with "brown": a.txt scores 6, b.txt scores 8
    let engine = SearchEngine::new(two_docs());
    let results = engine.search("brown");
    assert_eq!(ids(&results), vec!["b.txt", "a.txt"]);
    assert_eq!(results[0].1, "The slow brown turtle");

    let scored = engine.search_scored("brown");
    assert_eq!(scored.iter().map(|h| h.score).collect::<Vec<_>>(), vec![8, 6]);
    assert!(scored.iter().all(|h| h.matched_terms == 1));
}

#[test]
fn term_frequency_ties_keep_first_seen_order() {
    let engine = SearchEngine::new(two_docs()).with_rank_mode(RankMode::TermFrequency);
    assert_eq!(ids(&engine.search("brown")), vec!["a.txt", "b.txt"]);
}

#[test]
fn character_overlap_ties_keep_insertion_order() {
    for (first, second) in [("first.txt", "second.txt"), ("second.txt", "first.txt")] {
        let index = Arc::new(InvertedIndex::new());
        index.add_document(first, "brown bear");
        index.add_document(second, "brown bear");
        let engine = SearchEngine::new(index);

        let scored = engine.search_scored("brown");
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].score, scored[1].score);
        assert_eq!(ids(&engine.search("brown")), vec![first, second]);
    }
}

#[test]
fn term_unique_to_one_document() {
    let engine = SearchEngine::new(two_docs());
    assert_eq!(ids(&engine.search("turtle")), vec!["b.txt"]);
    assert_eq!(ids(&engine.search("FOX")), vec!["a.txt"]);
}

#[test]
fn absent_term_yields_nothing() {
    let engine = SearchEngine::new(two_docs());
    assert!(engine.search("zephyr").is_empty());
}

#[test]
fn stopword_only_query_yields_nothing() {
    let engine = SearchEngine::new(two_docs());
    assert!(engine.search("the").is_empty());
    assert!(engine.search("").is_empty());
    assert!(engine.search("   ,;  ").is_empty());
}

#[test]
fn unknown_terms_do_not_disturb_known_ones() {
    let engine = SearchEngine::new(two_docs()).with_rank_mode(RankMode::MatchCount);
    assert_eq!(ids(&engine.search("zephyr fox")), vec!["a.txt"]);
}

#[test]
fn match_count_counts_distinct_query_terms() {
    let index = two_docs();
    index.add_document("c.txt", "quick brown quick brown fox");
    let engine = SearchEngine::new(index).with_rank_mode(RankMode::MatchCount);
    let hits = engine.search_scored("quick quick brown fox");
    assert_eq!(hits[0].matched_terms, 3);
    assert_eq!(hits.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(), vec!["a.txt", "c.txt", "b.txt"]);
    assert_eq!(hits.iter().map(|h| h.score).collect::<Vec<_>>(), vec![3, 3, 1]);
}

#[test]
fn term_frequency_ranks_by_occurrences() {
    let index = Arc::new(InvertedIndex::new());
    index.add_document("one.txt", "rust");
    index.add_document("three.txt", "rust rust rust");
    index.add_document("two.txt", "rust and more rust");
    let engine = SearchEngine::new(index).with_rank_mode(RankMode::TermFrequency);
    assert_eq!(ids(&engine.search("rust")), vec!["three.txt", "two.txt", "one.txt"]);
}

#[test]
fn results_are_sorted_descending() {
    let index = Arc::new(InvertedIndex::new());
    for (i, body) in ["apple", "apple pie", "apple apple crumble", "pie"].iter().enumerate() {
        index.add_document(format!("{i}.txt"), *body);
    }
    for mode in [RankMode::CharacterOverlap, RankMode::TermFrequency, RankMode::MatchCount] {
        let engine = SearchEngine::new(Arc::clone(&index)).with_rank_mode(mode);
        let hits = engine.search_scored("apple pie");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score), "{mode} not descending");
        assert_eq!(hits.len(), 4);
    }
}

#[test]
fn search_sees_documents_added_later() {
    let index = two_docs();
    let engine = SearchEngine::new(Arc::clone(&index));
    assert!(engine.search("heron").is_empty());
    index.add_document("c.txt", "A grey heron");
    assert_eq!(ids(&engine.search("heron")), vec!["c.txt"]);
}
