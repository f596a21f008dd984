// Local frequency extraction
use crate::extraction::{ExtractionError, KeywordExtractor, StopWords};
use crate::weighting::{ExclusionSet, WeightedWord};
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Words kept by the product's local mode
pub const DEFAULT_LOCAL_MAX_WORDS: usize = 150;

/// Splits text into candidate words
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// CJK Unified Ideographs and their common extensions
pub fn is_han(c: char) -> bool {
    matches!(
        c as u32,
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x20000..=0x2EBEF
    )
}

/// UAX #29 word segmentation with ideograph-run handling
///
/// Word boundaries split Chinese text into single ideographs. Runs of adjacent
/// ideographs are regrouped and either emitted as overlapping bigrams
/// (`han_bigrams`) or one ideograph at a time. Characters in `run_breakers`
/// end a run and are emitted on their own.
#[derive(Debug, Clone, Default)]
pub struct UnicodeWordTokenizer {
    pub han_bigrams: bool,
    pub run_breakers: HashSet<char>,
}

impl UnicodeWordTokenizer {
    pub fn new(han_bigrams: bool) -> Self {
        Self {
            han_bigrams,
            run_breakers: HashSet::new(),
        }
    }

    pub fn with_run_breakers(mut self, breakers: HashSet<char>) -> Self {
        self.run_breakers = breakers;
        self
    }

    fn flush_run(&self, run: &mut Vec<char>, out: &mut Vec<String>) {
        match run.len() {
            0 => {}
            1 => out.push(run[0].to_string()),
            _ if self.han_bigrams => {
                out.extend(run.windows(2).map(|pair| pair.iter().collect::<String>()));
            }
            _ => out.extend(run.iter().map(char::to_string)),
        }
        run.clear();
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut run: Vec<char> = Vec::new();

        for segment in text.split_word_bounds() {
            let mut chars = segment.chars();
            let single_han = match (chars.next(), chars.next()) {
                (Some(c), None) if is_han(c) => Some(c),
                _ => None,
            };

            match single_han {
                Some(c) if !self.run_breakers.contains(&c) => run.push(c),
                _ => {
                    self.flush_run(&mut run, &mut out);
                    out.push(segment.to_string());
                }
            }
        }
        self.flush_run(&mut run, &mut out);
        out
    }
}

/// Digits, whitespace and punctuation only
const NOISE_PATTERN: &str = r"^[\d\s\p{P}]+$";

fn is_noise(word: &str) -> bool {
    static NOISE: OnceLock<Option<Regex>> = OnceLock::new();
    NOISE
        .get_or_init(|| Regex::new(NOISE_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(word))
}

/// Frequency counter over locally segmented words
pub struct LocalFrequencyExtractor {
    tokenizer: Box<dyn Tokenizer>,
    stop_words: StopWords,
    exclude_stop_words: bool,
    max_words: usize,
}

impl LocalFrequencyExtractor {
    /// Create the extractor with the built-in tokenizer
    ///
    /// # Arguments
    /// * `stop_words` - Words to drop when `exclude_stop_words` is set
    /// * `exclude_stop_words` - Whether stop words are filtered at all
    /// * `han_bigrams` - Emit ideograph bigrams instead of single ideographs
    /// * `max_words` - Number of most frequent words kept
    pub fn new(
        stop_words: StopWords,
        exclude_stop_words: bool,
        han_bigrams: bool,
        max_words: usize,
    ) -> Self {
        let mut tokenizer = UnicodeWordTokenizer::new(han_bigrams);
        if exclude_stop_words {
            tokenizer = tokenizer.with_run_breakers(stop_words.run_breakers());
        }
        Self::with_tokenizer(
            Box::new(tokenizer),
            stop_words,
            exclude_stop_words,
            max_words,
        )
    }

    pub fn with_tokenizer(
        tokenizer: Box<dyn Tokenizer>,
        stop_words: StopWords,
        exclude_stop_words: bool,
        max_words: usize,
    ) -> Self {
        Self {
            tokenizer,
            stop_words,
            exclude_stop_words,
            max_words,
        }
    }

    fn keep(&self, word: &str, exclusions: &ExclusionSet) -> bool {
        if word.is_empty() || is_noise(word) {
            return false;
        }

        let mut chars = word.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !is_han(c) {
                return false;
            }
        }

        if self.exclude_stop_words && self.stop_words.contains(word) {
            return false;
        }

        !exclusions.contains(word)
    }
}

impl KeywordExtractor for LocalFrequencyExtractor {
    fn extract(
        &self,
        text: &str,
        exclusions: &ExclusionSet,
    ) -> Result<Vec<WeightedWord>, ExtractionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, u64)> = Vec::new();

        for token in self.tokenizer.tokenize(text) {
            let word = token.trim();
            if !self.keep(word, exclusions) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push((word.to_string(), 1));
                }
            }
        }

        let distinct = counts.len();
        // Stable: equal counts keep first-occurrence order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(self.max_words);

        tracing::debug!(
            "Local extraction: {} distinct words, kept {}",
            distinct,
            counts.len()
        );

        Ok(counts
            .into_iter()
            .map(|(text, count)| WeightedWord::new(text, count as f64))
            .collect())
    }

    fn name(&self) -> &str {
        "local"
    }
}
