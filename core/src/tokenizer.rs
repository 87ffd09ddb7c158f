use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Upper bound on memoized query normalizations before the cache is reset.
const CACHE_CAPACITY: usize = 1024;

lazy_static! {
    // Letters, marks and digits; an apostrophe is kept only between word characters so
    // contractions ("don't") survive as one token and quotes are dropped.
    static ref RE: Regex = Regex::new(r"[\p{L}\p{M}\p{N}]+(?:'[\p{L}\p{M}\p{N}]+)*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn","couldn't",
            "d","did","didn","didn't","do","does","doesn","doesn't","doing","don","don't","down","during",
            "each","few","for","from","further",
            "had","hadn","hadn't","has","hasn","hasn't","have","haven","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn","isn't","it","it's","its","itself",
            "just","let's","ll","m","ma","me","mightn","mightn't","more","most","mustn","mustn't","my","myself",
            "needn","needn't","no","nor","not","now","o","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "re","s","same","shan","shan't","she","she'd","she'll","she's","should","should've","shouldn","shouldn't","so","some","such",
            "t","than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","wasn't","we","we'd","we'll","we're","we've","were","weren","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","will","with","won","won't","would","wouldn","wouldn't",
            "y","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
    static ref DEFAULT: Normalizer = Normalizer::new(NormalizerOptions::default());
}

/// Knobs on top of the base pipeline (lower-case, split, drop stopwords).
/// Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    /// Apply NFKC compatibility folding before lower-casing.
    #[serde(default)]
    pub unicode_nfkc: bool,
    /// Reduce each surviving token with the English Snowball stemmer.
    #[serde(default)]
    pub stem: bool,
}

/// Turns free text into the token sequence shared by indexing and querying.
pub struct Normalizer {
    options: NormalizerOptions,
    extra_stopwords: HashSet<String>,
    stemmer: Option<Stemmer>,
    cache: Mutex<HashMap<String, Arc<[String]>>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        let stemmer = options.stem.then(|| Stemmer::create(Algorithm::English));
        Self { options, extra_stopwords: HashSet::new(), stemmer, cache: Mutex::new(HashMap::new()) }
    }

    pub fn options(&self) -> NormalizerOptions {
        self.options
    }

    /// Adds words to the stopword set. Memoized normalizations are dropped since they
    /// may now contain tokens that would be filtered.
    pub fn extend_stopwords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_stopwords.extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self.cache.get_mut().clear();
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        STOPWORDS.contains(token) || self.extra_stopwords.contains(token)
    }

    /// Lower-case, split into words, drop stopwords. Order and duplicates are preserved.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded: String = text
            .chars()
            .map(|c| if c == '\u{2019}' || c == '\u{2018}' { '\'' } else { c })
            .collect();
        let lowered = if self.options.unicode_nfkc {
            folded.nfkc().collect::<String>().to_lowercase()
        } else {
            folded.to_lowercase()
        };

        let mut tokens = Vec::new();
        for mat in RE.find_iter(&lowered) {
            let token = mat.as_str();
            if self.is_stopword(token) { continue; }
            match &self.stemmer {
                Some(stemmer) => {
                    let stem = stemmer.stem(token);
                    if !self.is_stopword(&stem) {
                        tokens.push(stem.into_owned());
                    }
                }
                None => tokens.push(token.to_string()),
            }
        }
        tokens
    }

    /// Same as [`Normalizer::normalize`] but memoized by input text. Meant for queries,
    /// which repeat; document bodies should go through `normalize` directly.
    pub fn normalize_cached(&self, text: &str) -> Arc<[String]> {
        let cached = self.cache.lock().get(text).cloned();
        if let Some(tokens) = cached {
            return tokens;
        }
        let tokens: Arc<[String]> = self.normalize(text).into();
        let mut cache = self.cache.lock();
        if cache.len() >= CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(text.to_string(), Arc::clone(&tokens));
        tokens
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Normalize with the default options and stopword set.
pub fn normalize(text: &str) -> Vec<String> {
    DEFAULT.normalize(text)
}

/// The built-in English stopword list, sorted.
pub fn default_stopwords() -> Vec<&'static str> {
    let mut words: Vec<&'static str> = STOPWORDS.iter().copied().collect();
    words.sort_unstable();
    words
}
