//! Yuntu - Word Cloud Layout Generator
//!
//! Extracts weighted keywords from text, reconciles them with user exclusions
//! and inclusions, and packs them onto a canvas along an outward spiral so no
//! two words overlap. Output is pure geometry for an external renderer.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod layout;
pub mod pipeline;
pub mod weighting;

pub use error::{Result, YuntuError};
pub use layout::{CanvasSize, LayoutConfig, LayoutResult, PlacedWord};
pub use pipeline::{CloudOutput, CloudPipeline, GenerateRequest};
pub use weighting::WeightedWord;
