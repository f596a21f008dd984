//! Keyword extraction
//!
//! Turns source text into weighted keywords. Two backends exist:
//! - `local`: word segmentation and frequency counting, fully offline
//! - `semantic`: relevance scores from an external language-model command
//!
//! Both sit behind [`KeywordExtractor`] so the pipeline never knows which
//! one produced its words.

pub mod local;
pub mod semantic;
mod stopwords;

pub use local::{is_han, LocalFrequencyExtractor, Tokenizer, UnicodeWordTokenizer};
pub use semantic::{
    ApiKey, CommandTransport, SemanticExtractor, SemanticRequest, SemanticTransport,
};
pub use stopwords::StopWords;

use crate::config::Config;
use crate::weighting::{ExclusionSet, WeightedWord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failures raised by an extraction backend
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// API key env var is unset or empty
    #[error("API key not found: set the {env} environment variable")]
    MissingApiKey { env: String },

    /// The backend could not be reached or exited abnormally
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend answered with something that is not the expected JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid extraction input: {0}")]
    InvalidInput(String),
}

/// Which backend scores the source text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    #[default]
    Local,
    Semantic,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!("unknown extraction mode '{}'", other)),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

/// Source text -> weighted keywords
pub trait KeywordExtractor: Send + Sync {
    /// Extract keywords from `text`
    ///
    /// Backends that can filter early (local mode) drop words in
    /// `exclusions`; others may ignore it since the merge step filters again.
    fn extract(
        &self,
        text: &str,
        exclusions: &ExclusionSet,
    ) -> Result<Vec<WeightedWord>, ExtractionError>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}

/// Build the extractor selected by `config.extraction.mode`
pub fn build_extractor(config: &Config) -> crate::Result<Box<dyn KeywordExtractor>> {
    let extraction = &config.extraction;
    match extraction.mode {
        ExtractionMode::Local => {
            let stop_words = StopWords::builtin_with(&extraction.extra_stop_words);
            Ok(Box::new(LocalFrequencyExtractor::new(
                stop_words,
                extraction.exclude_stop_words,
                extraction.han_bigrams,
                extraction.max_words,
            )))
        }
        ExtractionMode::Semantic => {
            let transport = CommandTransport::from_command(&config.semantic.command)?;
            Ok(Box::new(SemanticExtractor::new(
                Box::new(transport),
                ApiKey::Env(config.semantic.api_key_env.clone()),
                config.semantic.model.clone(),
                config.semantic.max_input_chars,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("local".parse::<ExtractionMode>(), Ok(ExtractionMode::Local));
        assert_eq!(
            " Semantic ".parse::<ExtractionMode>(),
            Ok(ExtractionMode::Semantic)
        );
        assert!("cloud".parse::<ExtractionMode>().is_err());
        assert_eq!(ExtractionMode::Semantic.to_string(), "semantic");
    }

    #[test]
    fn test_build_local_by_default() {
        let extractor = build_extractor(&Config::default()).unwrap();
        assert_eq!(extractor.name(), "local");
    }

    #[test]
    fn test_build_semantic_needs_command() {
        let mut config = Config::default();
        config.extraction.mode = ExtractionMode::Semantic;
        assert!(build_extractor(&config).is_err());

        config.semantic.command = vec!["cat".to_string()];
        let extractor = build_extractor(&config).unwrap();
        assert_eq!(extractor.name(), "semantic");
    }
}
