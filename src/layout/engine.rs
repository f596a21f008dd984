// Spiral placement engine
use crate::error::{Result, YuntuError};
use crate::layout::{
    rotated_extent, CanvasSize, EmMeasurer, LayoutConfig, LayoutResult, OccupancyGrid,
    PlacedWord, Rect, RotationScheduler, SizedWord, SpiralPath, TextMeasurer,
};
use rand::Rng;
use std::sync::Arc;

/// Grid cells per shorter canvas side
const GRID_DIVISIONS: f64 = 20.0;

/// Places weight-ordered words on a canvas without overlap
///
/// Each word walks an outward spiral from the canvas center and takes the
/// first slot whose padded box stays inside the canvas and clears every
/// padded box placed before it. Words whose spiral runs off the canvas are
/// dropped and reported in [`LayoutResult::dropped`].
pub struct LayoutEngine {
    config: LayoutConfig,
    measurer: Arc<dyn TextMeasurer>,
}

impl LayoutEngine {
    /// Create an engine using the em-based text measurer
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_measurer(config, Arc::new(EmMeasurer::default()))
    }

    pub fn with_measurer(config: LayoutConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        Self { config, measurer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place `words` in the given order
    ///
    /// # Arguments
    /// * `words` - Words sorted by descending weight; equal weights keep their order
    /// * `canvas` - Canvas size, both sides must be positive
    /// * `rng` - Random source for rotations and spiral direction
    pub fn place<R: Rng + ?Sized>(
        &self,
        words: &[SizedWord],
        canvas: CanvasSize,
        rng: &mut R,
    ) -> Result<LayoutResult> {
        self.place_until(words, canvas, rng, || false)
    }

    /// Like [`place`](Self::place), checking `is_cancelled` before every word
    ///
    /// Returns [`YuntuError::Cancelled`] as soon as the check fires; words
    /// placed so far are discarded with the run.
    pub fn place_until<R, F>(
        &self,
        words: &[SizedWord],
        canvas: CanvasSize,
        rng: &mut R,
        is_cancelled: F,
    ) -> Result<LayoutResult>
    where
        R: Rng + ?Sized,
        F: Fn() -> bool,
    {
        if !canvas.is_valid() {
            return Err(YuntuError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let bounds = canvas.bounds();
        let padding = self.config.padding.max(0.0);
        let scheduler = RotationScheduler::new(&self.config);
        let mut grid = OccupancyGrid::new(canvas.width.min(canvas.height) / GRID_DIVISIONS);

        let mut placed = Vec::with_capacity(words.len());
        let mut dropped = Vec::new();

        for word in words {
            if is_cancelled() {
                tracing::debug!("Layout cancelled after {} words", placed.len());
                return Err(YuntuError::Cancelled);
            }
            validate_word(word)?;

            let rotation = scheduler.angle_for(rng);
            let clockwise = rng.random_bool(0.5);

            let (width, height) =
                self.measurer
                    .measure(&word.text, &self.config.font_family, word.font_size);
            let (box_w, box_h) = rotated_extent(width, height, rotation);

            let slot = find_slot(
                &grid,
                &bounds,
                canvas,
                &self.config,
                clockwise,
                box_w,
                box_h,
                padding,
            );
            match slot {
                Some((cx, cy)) => {
                    let bounding_box = Rect::centered(cx, cy, box_w, box_h);
                    grid.insert(bounding_box.inflate(padding));
                    placed.push(PlacedWord {
                        text: word.text.clone(),
                        font_family: self.config.font_family.clone(),
                        font_size_px: word.font_size,
                        rotation_deg: rotation,
                        center_x: cx,
                        center_y: cy,
                        bounding_box,
                    });
                }
                None => {
                    tracing::debug!(
                        "No room for '{}' at {:.1}px ({:.0}x{:.0}), dropping",
                        word.text,
                        word.font_size,
                        box_w,
                        box_h
                    );
                    dropped.push(word.text.clone());
                }
            }
        }

        tracing::info!(
            "Layout finished: {} placed, {} dropped on {}x{} canvas",
            placed.len(),
            dropped.len(),
            canvas.width,
            canvas.height
        );

        Ok(LayoutResult {
            words: placed,
            dropped,
            canvas,
            seed: None,
        })
    }
}

fn validate_word(word: &SizedWord) -> Result<()> {
    if word.text.trim().is_empty() {
        return Err(YuntuError::InvalidInput(
            "Word text cannot be empty".to_string(),
        ));
    }
    if !word.font_size.is_finite() || word.font_size <= 0.0 {
        return Err(YuntuError::InvalidInput(format!(
            "Font size for '{}' must be positive, got {}",
            word.text, word.font_size
        )));
    }
    Ok(())
}

/// Walk the spiral until a padded box fits
#[allow(clippy::too_many_arguments)]
fn find_slot(
    grid: &OccupancyGrid,
    bounds: &Rect,
    canvas: CanvasSize,
    config: &LayoutConfig,
    clockwise: bool,
    box_w: f64,
    box_h: f64,
    padding: f64,
) -> Option<(f64, f64)> {
    let padded_w = box_w + 2.0 * padding;
    let padded_h = box_h + 2.0 * padding;
    if padded_w > bounds.width || padded_h > bounds.height {
        return None;
    }

    // Same arithmetic as the box stored after placement
    SpiralPath::new(config.spiral, canvas, clockwise).find(|&(cx, cy)| {
        let candidate = Rect::centered(cx, cy, box_w, box_h).inflate(padding);
        bounds.contains(&candidate) && !grid.collides(&candidate)
    })
}
