//! Keyword weighting
//!
//! Reconciles extracted keywords with the user's exclusions and inclusions:
//! 1. Drop extracted words present in the exclusion set
//! 2. Fold the survivors into a text -> weight map (last value wins)
//! 3. Upsert inclusions; unweighted ones get `1.2 x` the maximum of the
//!    surviving words no inclusion overrides
//! 4. Rank by weight (stable) and cap the list

mod input;

pub use input::{parse_exclusions, parse_inclusions, split_tokens};

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Maximum used for unweighted inclusions when nothing survived exclusion
pub const EMPTY_MAX_WEIGHT: f64 = 50.0;

/// Boost applied to unweighted inclusions over the organic maximum
pub const INCLUSION_BOOST: f64 = 1.2;

/// Number of words kept by the product
pub const DEFAULT_WORD_CAP: usize = 200;

/// A keyword and its weight (frequency or relevance score)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedWord {
    pub text: String,
    pub value: f64,
}

impl WeightedWord {
    pub fn new(text: impl Into<String>, value: f64) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// A word the user forces into the cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionSpec {
    pub text: String,
    /// `None` means derive the weight from the surviving maximum
    pub explicit_weight: Option<f64>,
}

impl InclusionSpec {
    pub fn unset(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            explicit_weight: None,
        }
    }

    pub fn weighted(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            explicit_weight: Some(weight),
        }
    }
}

/// Words the user never wants to see
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim();
        !word.is_empty() && self.words.insert(word.to_string())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for word in iter {
            set.insert(word);
        }
        set
    }
}

/// Insertion-ordered text -> weight map
///
/// Overwriting a key keeps its original position, so ties in the final
/// ranking resolve by first appearance.
#[derive(Debug, Default)]
struct WeightMap {
    index: HashMap<String, usize>,
    entries: Vec<WeightedWord>,
}

impl WeightMap {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn set(&mut self, text: &str, value: f64) {
        match self.index.get(text) {
            Some(&i) => self.entries[i].value = value,
            None => {
                self.index.insert(text.to_string(), self.entries.len());
                self.entries.push(WeightedWord::new(text, value));
            }
        }
    }

    fn into_ranked(self, cap: usize) -> Vec<WeightedWord> {
        let mut entries = self.entries;
        // sort_by is stable
        entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        entries.truncate(cap);
        entries
    }
}

/// Merge extraction output with the user's exclusions and inclusions
///
/// Inclusions are applied after exclusion filtering and always win, so an
/// excluded word only reappears when it is explicitly included. Explicit
/// weights are taken verbatim, zero and negative values included.
///
/// # Returns
/// At most `cap` words, descending by weight, ties in first-seen order
pub fn merge(
    extracted: &[WeightedWord],
    exclusions: &ExclusionSet,
    inclusions: &[InclusionSpec],
    cap: usize,
) -> Vec<WeightedWord> {
    let overridden: HashSet<&str> = inclusions
        .iter()
        .filter(|i| i.explicit_weight.is_some())
        .map(|i| i.text.as_str())
        .collect();
    let mut map = WeightMap::new();
    let mut max_existing: Option<f64> = None;

    for word in extracted {
        if word.text.is_empty() || exclusions.contains(&word.text) {
            continue;
        }
        map.set(&word.text, word.value);
        // An explicit weight replaces the organic one, so it does not set the bar
        if overridden.contains(word.text.as_str()) {
            continue;
        }
        max_existing = Some(match max_existing {
            Some(max) => max.max(word.value),
            None => word.value,
        });
    }

    let derived_weight = max_existing.unwrap_or(EMPTY_MAX_WEIGHT) * INCLUSION_BOOST;

    for inclusion in inclusions {
        if inclusion.text.is_empty() {
            continue;
        }
        let weight = inclusion.explicit_weight.unwrap_or(derived_weight);
        map.set(&inclusion.text, weight);
    }

    let total = map.entries.len();
    let ranked = map.into_ranked(cap);
    if ranked.len() < total {
        tracing::debug!("Capped word list from {} to {} entries", total, cap);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted() -> Vec<WeightedWord> {
        vec![
            WeightedWord::new("AI", 80.0),
            WeightedWord::new("data", 60.0),
            WeightedWord::new("cloud", 40.0),
        ]
    }

    fn weight_of(words: &[WeightedWord], text: &str) -> Option<f64> {
        words.iter().find(|w| w.text == text).map(|w| w.value)
    }

    #[test]
    fn test_reference_scenario() {
        let exclusions = parse_exclusions("data");
        let inclusions = parse_inclusions("AI:100 新词");
        let merged = merge(&extracted(), &exclusions, &inclusions, 10);

        assert_eq!(weight_of(&merged, "AI"), Some(100.0));
        assert_eq!(weight_of(&merged, "cloud"), Some(40.0));
        // AI is overridden and data excluded, leaving cloud:40 as the maximum
        assert_eq!(weight_of(&merged, "新词"), Some(48.0));
        assert_eq!(weight_of(&merged, "data"), None);
        assert_eq!(merged[0].text, "AI");
    }

    #[test]
    fn test_boost_without_overrides() {
        let merged = merge(
            &extracted(),
            &parse_exclusions("data"),
            &[InclusionSpec::unset("新词")],
            10,
        );
        assert_eq!(weight_of(&merged, "新词"), Some(96.0));
        assert_eq!(merged[0].text, "新词");
    }

    #[test]
    fn test_unweighted_inclusion_of_extracted_word_is_boosted() {
        let merged = merge(
            &[WeightedWord::new("AI", 80.0), WeightedWord::new("cloud", 40.0)],
            &ExclusionSet::new(),
            &parse_inclusions("AI"),
            10,
        );
        assert_eq!(
            merged,
            vec![WeightedWord::new("AI", 96.0), WeightedWord::new("cloud", 40.0)]
        );
    }

    #[test]
    fn test_highlighting_the_only_word_raises_it() {
        let merged = merge(
            &[WeightedWord::new("AI", 80.0)],
            &ExclusionSet::new(),
            &parse_inclusions("AI"),
            10,
        );
        assert_eq!(merged, vec![WeightedWord::new("AI", 96.0)]);
    }

    #[test]
    fn test_unweighted_inclusions_rank_above_organic_words() {
        let merged = merge(
            &extracted(),
            &ExclusionSet::new(),
            &parse_inclusions("cloud 新词 AI:5"),
            10,
        );
        // AI is explicitly overridden, so data:60 is the organic maximum
        assert_eq!(weight_of(&merged, "cloud"), Some(72.0));
        assert_eq!(weight_of(&merged, "新词"), Some(72.0));
        assert_eq!(weight_of(&merged, "AI"), Some(5.0));
        assert!(merged[..2].iter().all(|w| w.value > 60.0));
    }

    #[test]
    fn test_only_overridden_survivors_fall_back_to_default() {
        let merged = merge(
            &[WeightedWord::new("AI", 80.0)],
            &ExclusionSet::new(),
            &[InclusionSpec::weighted("AI", 10.0), InclusionSpec::unset("x")],
            10,
        );
        assert_eq!(weight_of(&merged, "x"), Some(60.0));
        assert_eq!(weight_of(&merged, "AI"), Some(10.0));
    }

    #[test]
    fn test_boost_uses_surviving_maximum() {
        let exclusions = parse_exclusions("AI data");
        let merged = merge(&extracted(), &exclusions, &[InclusionSpec::unset("新词")], 10);
        assert_eq!(weight_of(&merged, "新词"), Some(48.0));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_extraction_uses_neutral_default() {
        let merged = merge(&[], &ExclusionSet::new(), &[InclusionSpec::unset("x")], 10);
        assert_eq!(merged, vec![WeightedWord::new("x", 60.0)]);
    }

    #[test]
    fn test_empty_everything_is_empty() {
        assert!(merge(&[], &ExclusionSet::new(), &[], 10).is_empty());
    }

    #[test]
    fn test_inclusion_restores_excluded_word() {
        let exclusions = parse_exclusions("data");
        let merged = merge(
            &extracted(),
            &exclusions,
            &[InclusionSpec::weighted("data", 5.0)],
            10,
        );
        assert_eq!(weight_of(&merged, "data"), Some(5.0));
    }

    #[test]
    fn test_duplicate_extraction_last_wins_first_position() {
        let words = vec![
            WeightedWord::new("a", 10.0),
            WeightedWord::new("b", 20.0),
            WeightedWord::new("a", 20.0),
        ];
        let merged = merge(&words, &ExclusionSet::new(), &[], 10);
        assert_eq!(
            merged,
            vec![WeightedWord::new("a", 20.0), WeightedWord::new("b", 20.0)]
        );
    }

    #[test]
    fn test_cap_keeps_top_stable() {
        let words: Vec<WeightedWord> = (0..10)
            .map(|i| WeightedWord::new(format!("w{i}"), if i % 2 == 0 { 5.0 } else { 1.0 }))
            .collect();
        let merged = merge(&words, &ExclusionSet::new(), &[], 3);
        let texts: Vec<&str> = merged.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["w0", "w2", "w4"]);
    }

    #[test]
    fn test_negative_explicit_weight_passes_through() {
        let merged = merge(
            &extracted(),
            &ExclusionSet::new(),
            &[InclusionSpec::weighted("neg", -3.0)],
            10,
        );
        assert_eq!(merged.last(), Some(&WeightedWord::new("neg", -3.0)));
    }

    #[test]
    fn test_zero_cap() {
        assert!(merge(&extracted(), &ExclusionSet::new(), &[], 0).is_empty());
    }
}
