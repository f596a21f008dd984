//! Generation pipeline
//!
//! `(text, exclusions, inclusions, config) -> LayoutResult` as one call:
//! extraction, merge, font sizing and placement run in sequence with no
//! shared state between requests.

mod worker;

pub use worker::LayoutWorker;

use crate::config::Config;
use crate::error::{Result, YuntuError};
use crate::extraction::{build_extractor, KeywordExtractor};
use crate::layout::{CanvasSize, LayoutEngine, LayoutResult, ScaleMapper};
use crate::weighting::{self, WeightedWord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// One generation request, as typed into the product's three input boxes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Source text to extract keywords from
    pub text: String,
    /// Raw exclusion input
    pub exclusions: String,
    /// Raw inclusion input (`word` or `word:weight` tokens)
    pub inclusions: String,
    /// Overrides the configured canvas
    pub canvas: Option<CanvasSize>,
    /// Fixed seed; a time-based one is drawn when absent
    pub seed: Option<u64>,
}

impl GenerateRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn exclude(mut self, input: impl Into<String>) -> Self {
        self.exclusions = input.into();
        self
    }

    pub fn include(mut self, input: impl Into<String>) -> Self {
        self.inclusions = input.into();
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasSize) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.inclusions.trim().is_empty()
    }
}

/// Ranked words and their layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudOutput {
    pub words: Vec<WeightedWord>,
    pub layout: LayoutResult,
}

/// Runs requests against a fixed configuration and extractor
pub struct CloudPipeline {
    config: Config,
    extractor: Box<dyn KeywordExtractor>,
    engine: LayoutEngine,
    scale: ScaleMapper,
}

impl CloudPipeline {
    /// Create a pipeline with the extractor selected by the configuration
    pub fn new(config: Config) -> Result<Self> {
        let extractor = build_extractor(&config)?;
        Ok(Self::with_extractor(config, extractor))
    }

    pub fn with_extractor(config: Config, extractor: Box<dyn KeywordExtractor>) -> Self {
        let engine = LayoutEngine::new(config.layout.clone());
        let scale = ScaleMapper::new(
            config.layout.scale,
            config.scale.min_font_px,
            config.scale.max_font_px,
        );
        Self {
            config,
            extractor,
            engine,
            scale,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract and merge without laying anything out
    pub fn rank(&self, request: &GenerateRequest) -> Result<Vec<WeightedWord>> {
        if request.is_blank() {
            return Err(YuntuError::EmptyInput);
        }

        let exclusions = weighting::parse_exclusions(&request.exclusions);
        let inclusions = weighting::parse_inclusions(&request.inclusions);

        let extracted = if request.text.trim().is_empty() {
            Vec::new()
        } else {
            let words = self.extractor.extract(&request.text, &exclusions)?;
            tracing::debug!(
                "{} extractor produced {} words",
                self.extractor.name(),
                words.len()
            );
            words
        };

        Ok(weighting::merge(
            &extracted,
            &exclusions,
            &inclusions,
            self.config.weighting.max_words,
        ))
    }

    /// Run the full pipeline
    pub fn generate(&self, request: &GenerateRequest) -> Result<CloudOutput> {
        self.generate_until(request, || false)
    }

    /// Run the full pipeline, abandoning placement once `is_cancelled` fires
    pub fn generate_until<F>(&self, request: &GenerateRequest, is_cancelled: F) -> Result<CloudOutput>
    where
        F: Fn() -> bool,
    {
        let words = self.rank(request)?;
        let sized = self.scale.size_words(&words);

        let canvas = request.canvas.unwrap_or(self.config.canvas);
        let seed = request.seed.unwrap_or_else(time_seed);
        tracing::debug!("Laying out {} words with seed {}", sized.len(), seed);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut layout = self
            .engine
            .place_until(&sized, canvas, &mut rng, is_cancelled)?;
        layout.seed = Some(seed);

        Ok(CloudOutput { words, layout })
    }
}

fn time_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros()) as u64
}
