//! Word-cloud layout
//!
//! Turns a weight-ordered word list into non-overlapping placed words:
//! - `scale`: weight -> font size (linear, log, sqrt)
//! - `rotation`: per-word angle from a configured range and step count
//! - `spiral`: outward search paths (Archimedean, rectangular)
//! - `measure`: text extents at a given font size
//! - `index`: occupancy grid over already placed boxes
//! - `engine`: the placement loop tying them together

mod engine;
mod index;
mod measure;
mod rotation;
mod scale;
mod spiral;

pub use engine::LayoutEngine;
pub use index::OccupancyGrid;
pub use measure::{rotated_extent, EmMeasurer, TextMeasurer};
pub use rotation::RotationScheduler;
pub use scale::{font_size, ScaleMapper};
pub use spiral::SpiralPath;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Font-size scale applied to word weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
    Sqrt,
}

/// Shape of the outward search path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpiralKind {
    #[default]
    Archimedean,
    Rectangular,
}

impl FromStr for ScaleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "log" => Ok(Self::Log),
            "sqrt" => Ok(Self::Sqrt),
            other => Err(format!(
                "Scale must be 'linear', 'log' or 'sqrt', got '{}'",
                other
            )),
        }
    }
}

impl FromStr for SpiralKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "archimedean" => Ok(Self::Archimedean),
            "rectangular" => Ok(Self::Rectangular),
            other => Err(format!(
                "Spiral must be 'archimedean' or 'rectangular', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Log => write!(f, "log"),
            Self::Sqrt => write!(f, "sqrt"),
        }
    }
}

impl fmt::Display for SpiralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archimedean => write!(f, "archimedean"),
            Self::Rectangular => write!(f, "rectangular"),
        }
    }
}

/// Per-run layout configuration
///
/// `rotation_steps == 0` pins every word to `rotation_range.0`; any other
/// value picks uniformly among that many evenly spaced angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub font_family: String,
    /// (min, max) in degrees
    pub rotation_range: (f64, f64),
    pub rotation_steps: u32,
    pub scale: ScaleKind,
    pub spiral: SpiralKind,
    /// Margin kept around every word, in pixels
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_family: "Microsoft YaHei".to_string(),
            rotation_range: (0.0, 0.0),
            rotation_steps: 0,
            scale: ScaleKind::Linear,
            spiral: SpiralKind::Archimedean,
            padding: 2.0,
        }
    }
}

/// Canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a spiral search is meaningful on this canvas
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The canvas as a rectangle in center-relative coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

/// Axis-aligned rectangle (`x`, `y` is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow by `margin` on all four sides
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Interior overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// A word ready for placement, already mapped to its font size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedWord {
    pub text: String,
    pub font_size: f64,
}

impl SizedWord {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// A word placed on the canvas
///
/// Coordinates are relative to the canvas center; a renderer translates by
/// `(width / 2, height / 2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub font_family: String,
    pub font_size_px: f64,
    pub rotation_deg: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Unpadded hull of the rotated word
    pub bounding_box: Rect,
}

/// Output of one layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Placed words in placement (weight) order
    pub words: Vec<PlacedWord>,
    /// Words the spiral search could not fit, in input order
    pub dropped: Vec<String>,
    pub canvas: CanvasSize,
    /// Seed of the random source, when the caller seeded it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl LayoutResult {
    pub fn placed_count(&self) -> usize {
        self.words.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// True when every requested word found a slot
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}
