use deskfind_core::tokenizer::{default_stopwords, normalize, Normalizer, NormalizerOptions};

#[test]
fn it_is_deterministic() {
    let text = "Running Runners RUN! The café's menu, 42 items.";
    assert_eq!(normalize(text), normalize(text));
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn no_stopword_survives() {
    let text = default_stopwords().join(" ").to_uppercase();
    assert!(normalize(&text).is_empty());
    for word in default_stopwords() {
        let sentence = format!("alpha {word} omega");
        assert_eq!(normalize(&sentence), vec!["alpha", "omega"], "stopword {word} leaked");
    }
}

#[test]
fn it_preserves_order_and_duplicates() {
    assert_eq!(normalize("zebra apple zebra"), vec!["zebra", "apple", "zebra"]);
}

#[test]
fn empty_and_non_english_input() {
    assert!(normalize("").is_empty());
    assert!(normalize("  ...  !!").is_empty());
    assert_eq!(normalize("Ünïcödé Straße"), vec!["ünïcödé", "straße"]);
    assert_eq!(normalize("東京 2024"), vec!["東京", "2024"]);
}

#[test]
fn nfkc_folds_compatibility_forms() {
    let plain = Normalizer::default();
    assert_eq!(plain.normalize("ｆｕｌｌｗｉｄｔｈ"), vec!["ｆｕｌｌｗｉｄｔｈ"]);
    let folded = Normalizer::new(NormalizerOptions { unicode_nfkc: true, stem: false });
    assert_eq!(folded.normalize("ｆｕｌｌｗｉｄｔｈ"), vec!["fullwidth"]);
}

#[test]
fn it_stems_when_enabled() {
    let n = Normalizer::new(NormalizerOptions { unicode_nfkc: true, stem: true });
    let words = n.normalize("Running Runners RUN! The café's menu.");
    assert!(words.contains(&"run".to_string()));
    assert!(!words.contains(&"the".to_string()));
}
