// Parsing of free-form exclusion / inclusion input
use crate::weighting::{ExclusionSet, InclusionSpec};
use regex::Regex;
use std::sync::OnceLock;

/// Commas (ASCII or full-width), whitespace and newlines
const DELIMITER_PATTERN: &str = r"[,，\s]+";

fn delimiters() -> Option<&'static Regex> {
    static DELIMITERS: OnceLock<Option<Regex>> = OnceLock::new();
    DELIMITERS
        .get_or_init(|| Regex::new(DELIMITER_PATTERN).ok())
        .as_ref()
}

/// Split user input into trimmed, non-empty tokens
pub fn split_tokens(input: &str) -> impl Iterator<Item = &str> {
    let pieces: Vec<&str> = match delimiters() {
        Some(re) => re.split(input).collect(),
        None => input.split_whitespace().collect(),
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Parse the exclusion box into a set of words
pub fn parse_exclusions(input: &str) -> ExclusionSet {
    split_tokens(input).collect()
}

/// Parse the inclusion box
///
/// Each token is `word` or `word:weight` (a full-width colon works too).
/// A weight that is not a finite number leaves the spec unset; a token whose
/// word part is empty is dropped.
pub fn parse_inclusions(input: &str) -> Vec<InclusionSpec> {
    split_tokens(input).filter_map(parse_inclusion).collect()
}

fn parse_inclusion(token: &str) -> Option<InclusionSpec> {
    let (text, weight) = match token.split_once([':', '：']) {
        Some((text, suffix)) => (text.trim(), parse_weight(suffix)),
        None => (token, None),
    };

    if text.is_empty() {
        tracing::debug!("Dropping inclusion token without a word: '{}'", token);
        return None;
    }

    Some(InclusionSpec {
        text: text.to_string(),
        explicit_weight: weight,
    })
}

fn parse_weight(suffix: &str) -> Option<f64> {
    let suffix = suffix.trim();
    if suffix.is_empty() {
        return None;
    }
    match suffix.parse::<f64>() {
        Ok(w) if w.is_finite() => Some(w),
        _ => {
            tracing::debug!("Ignoring malformed inclusion weight '{}'", suffix);
            None
        }
    }
}
